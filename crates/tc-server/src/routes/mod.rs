//! Route handlers for the HTTP API.

pub mod albums;
pub mod artists;
pub mod genres;
pub mod songs;
pub mod stream;
pub mod streaming_helpers;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tc_core::{Error, LibraryFilter, Result};

/// Success envelope: every resource endpoint answers `{"data": [...]}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

impl<T> DataResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn single(item: T) -> Self {
        Self { data: vec![item] }
    }
}

/// Query parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListQuery {
    pub album_id: Option<String>,
    pub artist_id: Option<String>,
    pub genre_id: Option<String>,
}

impl ListQuery {
    /// Parse the raw parameters into a [`LibraryFilter`].
    ///
    /// Empty values are ignored; anything else that is not a number is a
    /// validation error.
    pub fn to_filter(&self) -> Result<LibraryFilter> {
        Ok(LibraryFilter {
            album_id: parse_filter("album-id", self.album_id.as_deref())?,
            artist_id: parse_filter("artist-id", self.artist_id.as_deref())?,
            genre_id: parse_filter("genre-id", self.genre_id.as_deref())?,
        })
    }
}

fn parse_filter<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| Error::Validation(format!("{name} must be a number, got {v:?}"))),
    }
}

/// Parse an id taken from the URL path. Ids that cannot exist are not found.
pub fn parse_path_id<T: FromStr>(entity: &str, raw: &str) -> Result<T> {
    raw.parse().map_err(|_| Error::not_found(entity, raw))
}
