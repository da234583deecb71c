//! Unified error type for tunecast.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in tunecast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "song", "album").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The external segmenter failed, timed out, or produced no playlist.
    #[error("Segmentation failed for song {song}: {message}")]
    SegmentationFailure {
        /// Song whose preparation failed.
        song: String,
        /// Human-readable error description.
        message: String,
    },

    /// A segment filename failed path-safety validation.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool could not be found or started.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::SegmentationFailure { .. } => 500,
            Error::InvalidPath(_) => 400,
            Error::Validation(_) => 400,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Tool { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::SegmentationFailure { .. } => "segmentation_failure",
            Error::InvalidPath(_) => "invalid_path",
            Error::Validation(_) => "validation_error",
            Error::Database { .. } => "database_error",
            Error::Io { .. } => "io_error",
            Error::Tool { .. } => "tool_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::SegmentationFailure`].
    pub fn segmentation(song: impl fmt::Display, message: impl Into<String>) -> Self {
        Error::SegmentationFailure {
            song: song.to_string(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("song", 42);
        assert_eq!(err.to_string(), "song not found: 42");
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn segmentation_display() {
        let err = Error::segmentation(7, "exited with status 1");
        assert_eq!(
            err.to_string(),
            "Segmentation failed for song 7: exited with status 1"
        );
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.code(), "segmentation_failure");
    }

    #[test]
    fn invalid_path_is_client_error() {
        let err = Error::InvalidPath("../etc/passwd".into());
        assert_eq!(err.to_string(), "Invalid path: ../etc/passwd");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("album-id must be a number".into());
        assert_eq!(err.to_string(), "Validation error: album-id must be a number");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn database_display() {
        let err = Error::database("connection refused");
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.code(), "io_error");
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("mediafilesegmenter", "not found");
        assert_eq!(err.to_string(), "Tool error [mediafilesegmenter]: not found");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn internal_display() {
        let err = Error::Internal("unexpected state".into());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.http_status(), 500);
    }
}
