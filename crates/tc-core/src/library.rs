//! Music library domain models.
//!
//! These are the rows the data-access layer hands back. On the wire they are
//! wrapped in [`Resource`] objects of the form
//! `{"type": "songs", "id": "42", "attributes": {...}}`.

use serde::Serialize;
use std::path::PathBuf;

use crate::ids::{AlbumId, ArtistId, GenreId, SongId};

/// A musical genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// A recording artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
}

/// An album, belonging to one artist and optionally one genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub genre_id: Option<GenreId>,
    pub year: Option<i32>,
}

/// A song and the location of its source audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub album_id: Option<AlbumId>,
    pub artist_id: Option<ArtistId>,
    pub genre_id: Option<GenreId>,
    pub track_number: Option<i32>,
    pub duration_secs: Option<f64>,
    /// Source audio file fed to the segmenter. Never serialized to clients.
    pub file_path: PathBuf,
}

/// Optional filters accepted by the list endpoints, combined with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    pub album_id: Option<AlbumId>,
    pub artist_id: Option<ArtistId>,
    pub genre_id: Option<GenreId>,
}

impl LibraryFilter {
    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.album_id.is_none() && self.artist_id.is_none() && self.genre_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// Wire representation
// ---------------------------------------------------------------------------

/// A typed resource object as it appears in a `data` array.
#[derive(Debug, Clone, Serialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub attributes: A,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreAttributes {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistAttributes {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AlbumAttributes {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SongAttributes {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Genre {
    pub fn to_resource(&self) -> Resource<GenreAttributes> {
        Resource {
            kind: "genres",
            id: self.id.to_string(),
            attributes: GenreAttributes {
                name: self.name.clone(),
            },
        }
    }
}

impl Artist {
    pub fn to_resource(&self) -> Resource<ArtistAttributes> {
        Resource {
            kind: "artists",
            id: self.id.to_string(),
            attributes: ArtistAttributes {
                name: self.name.clone(),
            },
        }
    }
}

impl Album {
    pub fn to_resource(&self) -> Resource<AlbumAttributes> {
        Resource {
            kind: "albums",
            id: self.id.to_string(),
            attributes: AlbumAttributes {
                title: self.title.clone(),
                artist_id: self.artist_id.map(|id| id.to_string()),
                genre_id: self.genre_id.map(|id| id.to_string()),
                year: self.year,
            },
        }
    }
}

impl Song {
    pub fn to_resource(&self) -> Resource<SongAttributes> {
        Resource {
            kind: "songs",
            id: self.id.to_string(),
            attributes: SongAttributes {
                title: self.title.clone(),
                album_id: self.album_id.map(|id| id.to_string()),
                artist_id: self.artist_id.map(|id| id.to_string()),
                genre_id: self.genre_id.map(|id| id.to_string()),
                track_number: self.track_number,
                duration: self.duration_secs,
            },
        }
    }
}
