//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`tc_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and get the JSON API error envelope:
//!
//! ```json
//! {"errors": [{"status": "404", "code": "not_found", "title": "Not Found",
//!              "detail": "The requested resource does not exist."}]}
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Detail text for every server-side failure; internals never reach clients.
pub const SERVER_ERROR_DETAIL: &str = "There is an error processing the request.";

/// Detail text for unknown resources.
pub const NOT_FOUND_DETAIL: &str = "The requested resource does not exist.";

/// Wrapper so we can implement `IntoResponse` for an external type.
///
/// Responses are built inside the request span, so log lines emitted here
/// carry the request id.
#[derive(Debug)]
pub struct AppError {
    inner: tc_core::Error,
}

impl AppError {
    pub fn new(inner: tc_core::Error) -> Self {
        Self { inner }
    }
}

impl From<tc_core::Error> for AppError {
    fn from(e: tc_core::Error) -> Self {
        Self::new(e)
    }
}

/// Top-level error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorObject>,
}

/// One entry of the `errors` array.
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub status: String,
    pub code: &'static str,
    pub title: String,
    pub detail: String,
}

impl ErrorResponse {
    /// Build the single-error envelope for `status`.
    pub fn single(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorObject {
                status: status.as_u16().to_string(),
                code,
                title: status.canonical_reason().unwrap_or("Error").to_string(),
                detail: detail.into(),
            }],
        }
    }

    /// Envelope for a route or resource that does not exist.
    pub fn not_found() -> Self {
        Self::single(StatusCode::NOT_FOUND, "not_found", NOT_FOUND_DETAIL)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let detail = if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
            SERVER_ERROR_DETAIL.to_string()
        } else if status == StatusCode::NOT_FOUND {
            tracing::debug!(error = %self.inner, "Resource not found");
            NOT_FOUND_DETAIL.to_string()
        } else {
            self.inner.to_string()
        };

        let body = ErrorResponse::single(status, self.inner.code(), detail);
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_produces_404_envelope() {
        let response = AppError::new(tc_core::Error::not_found("song", 99)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        let err = &body["errors"][0];
        assert_eq!(err["status"], "404");
        assert_eq!(err["code"], "not_found");
        assert_eq!(err["title"], "Not Found");
        assert_eq!(err["detail"], NOT_FOUND_DETAIL);
    }

    #[tokio::test]
    async fn segmentation_failure_hides_details() {
        let err = tc_core::Error::segmentation(7, "mediafilesegmenter exited with status 1");
        let response = AppError::new(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["code"], "segmentation_failure");
        assert_eq!(body["errors"][0]["detail"], SERVER_ERROR_DETAIL);
        assert!(!body.to_string().contains("mediafilesegmenter"));
    }

    #[tokio::test]
    async fn invalid_path_produces_400() {
        let response =
            AppError::new(tc_core::Error::InvalidPath("../etc".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["code"], "invalid_path");
        assert_eq!(body["errors"][0]["title"], "Bad Request");
    }
}
