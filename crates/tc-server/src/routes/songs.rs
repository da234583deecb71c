//! Song endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use tc_core::{Error, Resource, SongAttributes, SongId};

use super::{parse_path_id, DataResponse, ListQuery};
use crate::context::AppContext;
use crate::error::AppError;
use crate::library::{lookup_song, with_conn};

/// GET /songs
///
/// No matching songs is a 404.
pub async fn list_songs(
    State(ctx): State<AppContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DataResponse<Resource<SongAttributes>>>, AppError> {
    let filter = query.to_filter()?;
    let songs = with_conn(&ctx.db, move |conn| {
        tc_db::queries::songs::list_songs(conn, &filter)
    })
    .await?;

    if songs.is_empty() {
        return Err(Error::not_found("songs", "any").into());
    }

    Ok(Json(DataResponse::new(
        songs.iter().map(|s| s.to_resource()).collect(),
    )))
}

/// GET /songs/{id}
pub async fn get_song(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Resource<SongAttributes>>>, AppError> {
    let song_id: SongId = parse_path_id("song", &id)?;
    let song = lookup_song(&ctx.db, song_id)
        .await?
        .ok_or_else(|| Error::not_found("song", song_id))?;

    Ok(Json(DataResponse::single(song.to_resource())))
}
