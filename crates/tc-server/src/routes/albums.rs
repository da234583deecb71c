//! Album endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use tc_core::{AlbumAttributes, AlbumId, Error, Resource};

use super::{parse_path_id, DataResponse, ListQuery};
use crate::context::AppContext;
use crate::error::AppError;
use crate::library::with_conn;

/// GET /albums
///
/// An empty result is an empty `data` array, not an error.
pub async fn list_albums(
    State(ctx): State<AppContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DataResponse<Resource<AlbumAttributes>>>, AppError> {
    let filter = query.to_filter()?;
    let albums = with_conn(&ctx.db, move |conn| {
        tc_db::queries::albums::list_albums(conn, &filter)
    })
    .await?;

    Ok(Json(DataResponse::new(
        albums.iter().map(|a| a.to_resource()).collect(),
    )))
}

/// GET /albums/{id}
pub async fn get_album(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Resource<AlbumAttributes>>>, AppError> {
    let album_id: AlbumId = parse_path_id("album", &id)?;
    let album = with_conn(&ctx.db, move |conn| {
        tc_db::queries::albums::get_album(conn, album_id)
    })
    .await?
    .ok_or_else(|| Error::not_found("album", album_id))?;

    Ok(Json(DataResponse::single(album.to_resource())))
}
