//! tc-server: HTTP API, on-demand HLS stream preparation, and process
//! lifecycle.
//!
//! This crate ties the other tc-* crates into a running server. It provides:
//!
//! - Axum-based JSON API over the music library
//! - Lazy, per-song HLS preparation through an external segmenter
//! - Playlist and segment serving with range support
//! - Graceful shutdown that tears down the stream workspace

pub mod context;
pub mod error;
pub mod library;
pub mod lifecycle;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod stream_prep;

use std::net::SocketAddr;

use tc_core::config::Config;

use crate::context::AppContext;
use crate::lifecycle::Lifecycle;

/// Start the tunecast server.
///
/// This is the main entry point. It allocates the stream workspace, opens
/// the library database, discovers the segmenter, and serves HTTP until a
/// shutdown signal arrives. The workspace is removed before returning.
pub async fn start(config: Config) -> tc_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let lifecycle = Lifecycle::new(config.server.shutdown_grace());

    // Without a workspace there is nothing to stream into.
    let workspace = tc_av::StreamWorkspace::create(config.stream.workspace_root.as_deref())?;

    let db_path = &config.server.db_path;
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db = tc_db::pool::init_pool(&db_path.to_string_lossy())?;
    tracing::info!("Library database opened at {}", db_path.display());

    let tools = tc_av::ToolRegistry::discover(&config.tools);
    for info in tools.check_all() {
        if info.available {
            tracing::info!(
                "Tool found: {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::debug!("Tool not found: {}", info.name);
        }
    }
    let segmenter = tc_av::segmenter_from_config(&tools, &config.tools);

    let ctx = AppContext::new(
        db,
        workspace.layout(),
        segmenter,
        config.stream.segment_timeout(),
    );
    let app = router::build_router(ctx);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| tc_core::Error::Validation(format!("Invalid server address: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| tc_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!("Listening on {addr}");

    lifecycle.spawn_signal_handler();
    lifecycle.run(listener, app, workspace).await;

    tracing::info!("Server shutdown complete");
    Ok(())
}
