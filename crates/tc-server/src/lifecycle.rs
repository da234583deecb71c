//! Process lifecycle: serve until asked to stop, drain, then clean up.
//!
//! ```text
//! Starting -> Serving -> ShuttingDown -> Stopped
//! ```
//!
//! The first SIGINT/SIGTERM stops the listener and lets in-flight requests
//! finish for up to the configured grace period. A second signal abandons
//! them immediately. Either way the stream workspace is removed before
//! [`Lifecycle::run`] returns.

use std::time::Duration;

use axum::Router;
use tc_av::StreamWorkspace;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Where the server is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Starting,
    Serving,
    ShuttingDown,
    Stopped,
}

/// Owns the shutdown tokens and drives the server through its phases.
pub struct Lifecycle {
    phase: watch::Sender<LifecyclePhase>,
    shutdown: CancellationToken,
    force: CancellationToken,
    grace: Duration,
}

impl Lifecycle {
    pub fn new(grace: Duration) -> Self {
        let (phase, _) = watch::channel(LifecyclePhase::Starting);
        Self {
            phase,
            shutdown: CancellationToken::new(),
            force: CancellationToken::new(),
            grace,
        }
    }

    /// Cancel this to begin a graceful shutdown.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel this to stop waiting for in-flight requests.
    pub fn force_token(&self) -> CancellationToken {
        self.force.clone()
    }

    /// Watch phase transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecyclePhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> LifecyclePhase {
        *self.phase.borrow()
    }

    /// Translate process signals into the shutdown and force tokens.
    pub fn spawn_signal_handler(&self) {
        let shutdown = self.shutdown.clone();
        let force = self.force.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_signal() => {
                    tracing::info!("Shutdown signal received; draining requests");
                    shutdown.cancel();
                }
                _ = shutdown.cancelled() => {}
            }

            tokio::select! {
                _ = shutdown_signal() => {
                    tracing::warn!("Second shutdown signal received; aborting in-flight requests");
                    force.cancel();
                }
                _ = force.cancelled() => {}
            }
        });
    }

    /// Serve `app` on `listener` until shutdown, then remove `workspace`.
    pub async fn run(self, listener: TcpListener, app: Router, workspace: StreamWorkspace) {
        self.phase.send_replace(LifecyclePhase::Serving);

        let graceful = self.shutdown.clone();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(graceful.cancelled_owned())
                .await
        });

        tokio::select! {
            result = &mut server => {
                log_server_exit(result);
                self.phase.send_replace(LifecyclePhase::ShuttingDown);
            }
            _ = self.shutdown.cancelled() => {
                self.phase.send_replace(LifecyclePhase::ShuttingDown);
                tracing::info!(grace = ?self.grace, "Waiting for in-flight requests");

                tokio::select! {
                    result = &mut server => log_server_exit(result),
                    _ = tokio::time::sleep(self.grace) => {
                        tracing::warn!("Grace period elapsed; aborting in-flight requests");
                        server.abort();
                    }
                    _ = self.force.cancelled() => {
                        tracing::warn!("Forced shutdown; aborting in-flight requests");
                        server.abort();
                    }
                }
            }
        }

        workspace.destroy();
        self.phase.send_replace(LifecyclePhase::Stopped);
    }
}

fn log_server_exit(result: Result<std::io::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::info!("HTTP server stopped"),
        Ok(Err(e)) => tracing::error!("HTTP server error: {e}"),
        Err(e) => tracing::error!("HTTP server task failed: {e}"),
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
