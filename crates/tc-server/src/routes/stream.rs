//! HLS stream endpoints: the per-song playlist and its segments.
//!
//! The playlist request is what triggers preparation; segment requests only
//! serve files a previous playlist request produced.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use tc_av::SegmentName;
use tc_core::{Error, SongId};

use super::parse_path_id;
use super::streaming_helpers::serve_file;
use crate::context::AppContext;
use crate::error::AppError;
use crate::library::lookup_song;

pub const PLAYLIST_CONTENT_TYPE: &str = "application/x-mpegURL";
pub const SEGMENT_CONTENT_TYPE: &str = "audio/aac";

fn range(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::RANGE).and_then(|v| v.to_str().ok())
}

/// GET /songs/{id}/stream
pub async fn stream_playlist(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let song_id: SongId = parse_path_id("song", &id)?;
    let song = lookup_song(&ctx.db, song_id)
        .await?
        .ok_or_else(|| Error::not_found("song", song_id))?;

    let playlist = ctx.preparer.ensure_prepared(song_id, song.file_path).await?;

    Ok(serve_file(&playlist, PLAYLIST_CONTENT_TYPE, range(&headers)).await?)
}

/// GET /songs/{id}/{segment}
///
/// The segment name is validated before anything else so an unsafe name
/// never reaches the database or the filesystem.
pub async fn stream_segment(
    State(ctx): State<AppContext>,
    Path((id, segment)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let segment = SegmentName::parse(&segment)?;
    let song_id: SongId = parse_path_id("song", &id)?;

    if lookup_song(&ctx.db, song_id).await?.is_none() {
        return Err(Error::not_found("song", song_id).into());
    }

    let path = ctx.workspace.segment_path(song_id, &segment);
    Ok(serve_file(&path, SEGMENT_CONTENT_TYPE, range(&headers)).await?)
}
