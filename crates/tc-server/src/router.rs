//! Axum router construction.

use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::error::ErrorResponse;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/albums", get(routes::albums::list_albums))
        .route("/albums/{id}", get(routes::albums::get_album))
        .route("/artists", get(routes::artists::list_artists))
        .route("/artists/{id}", get(routes::artists::get_artist))
        .route("/genres", get(routes::genres::list_genres))
        .route("/genres/{id}", get(routes::genres::get_genre))
        .route("/songs", get(routes::songs::list_songs))
        .route("/songs/{id}", get(routes::songs::get_song))
        .route("/songs/{id}/stream", get(routes::stream::stream_playlist))
        .route("/songs/{id}/{segment}", get(routes::stream::stream_segment))
        .fallback(not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found()))
}
