//! Artist endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use tc_core::{ArtistAttributes, ArtistId, Error, Resource};

use super::{parse_path_id, DataResponse, ListQuery};
use crate::context::AppContext;
use crate::error::AppError;
use crate::library::with_conn;

/// GET /artists
///
/// No matching artists is a 404, matching `/songs`.
pub async fn list_artists(
    State(ctx): State<AppContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DataResponse<Resource<ArtistAttributes>>>, AppError> {
    let filter = query.to_filter()?;
    let artists = with_conn(&ctx.db, move |conn| {
        tc_db::queries::artists::list_artists(conn, &filter)
    })
    .await?;

    if artists.is_empty() {
        return Err(Error::not_found("artists", "any").into());
    }

    Ok(Json(DataResponse::new(
        artists.iter().map(|a| a.to_resource()).collect(),
    )))
}

/// GET /artists/{id}
pub async fn get_artist(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Resource<ArtistAttributes>>>, AppError> {
    let artist_id: ArtistId = parse_path_id("artist", &id)?;
    let artist = with_conn(&ctx.db, move |conn| {
        tc_db::queries::artists::get_artist(conn, artist_id)
    })
    .await?
    .ok_or_else(|| Error::not_found("artist", artist_id))?;

    Ok(Json(DataResponse::single(artist.to_resource())))
}
