//! Genre endpoints.

use axum::extract::{Path, State};
use axum::Json;
use tc_core::{Error, GenreAttributes, GenreId, Resource};

use super::{parse_path_id, DataResponse};
use crate::context::AppContext;
use crate::error::AppError;
use crate::library::with_conn;

/// GET /genres
pub async fn list_genres(
    State(ctx): State<AppContext>,
) -> Result<Json<DataResponse<Resource<GenreAttributes>>>, AppError> {
    let genres = with_conn(&ctx.db, tc_db::queries::genres::list_genres).await?;
    Ok(Json(DataResponse::new(
        genres.iter().map(|g| g.to_resource()).collect(),
    )))
}

/// GET /genres/{id}
pub async fn get_genre(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Resource<GenreAttributes>>>, AppError> {
    let genre_id: GenreId = parse_path_id("genre", &id)?;
    let genre = with_conn(&ctx.db, move |conn| {
        tc_db::queries::genres::get_genre(conn, genre_id)
    })
    .await?
    .ok_or_else(|| Error::not_found("genre", genre_id))?;

    Ok(Json(DataResponse::single(genre.to_resource())))
}
