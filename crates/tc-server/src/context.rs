//! Application context shared by all request handlers.
//!
//! [`AppContext`] is handed to every route through Axum state. It only holds
//! `Arc`s and cheap clones, so cloning it per request is free.

use std::sync::Arc;
use std::time::Duration;

use tc_av::{Segmenter, WorkspaceLayout};
use tc_db::pool::DbPool;

use crate::stream_prep::StreamPreparer;

/// Application context shared by all request handlers (via Axum state).
#[derive(Clone)]
pub struct AppContext {
    /// Library database connection pool.
    pub db: DbPool,
    /// Paths inside the stream workspace.
    pub workspace: WorkspaceLayout,
    /// Per-song HLS preparation.
    pub preparer: Arc<StreamPreparer>,
}

impl AppContext {
    /// Build a context around an existing pool, workspace and segmenter.
    /// Each segmenter run is bounded by `segment_timeout`.
    pub fn new(
        db: DbPool,
        workspace: WorkspaceLayout,
        segmenter: Arc<dyn Segmenter>,
        segment_timeout: Duration,
    ) -> Self {
        let preparer = Arc::new(StreamPreparer::new(
            workspace.clone(),
            segmenter,
            segment_timeout,
        ));
        Self {
            db,
            workspace,
            preparer,
        }
    }
}
