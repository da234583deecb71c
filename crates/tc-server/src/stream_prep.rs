//! On-demand HLS preparation.
//!
//! The first stream request for a song runs the external segmenter into a
//! staging directory and, once it succeeds, renames that directory to
//! `<workspace>/<song id>/`. Every later request finds `prog_index.m3u8` and
//! returns immediately. A song directory only ever appears complete, so a
//! playlist a segmenter is still writing is never served, and a failed or
//! timed-out run leaves nothing behind for the next request to trip over.
//!
//! Concurrent first requests for one song are serialized on a per-song
//! mutex so the segmenter runs at most once per song. Mutexes are created on
//! demand and never removed; different songs never share one.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tc_av::{Segmenter, WorkspaceLayout, PLAYLIST_FILE};
use tc_core::{Error, Result, SongId};
use tokio::sync::Mutex;

/// Ensures each song's playlist and segments exist in the workspace.
pub struct StreamPreparer {
    workspace: WorkspaceLayout,
    segmenter: Arc<dyn Segmenter>,
    timeout: Duration,
    locks: DashMap<SongId, Arc<Mutex<()>>>,
    runs: AtomicU64,
}

impl StreamPreparer {
    pub fn new(workspace: WorkspaceLayout, segmenter: Arc<dyn Segmenter>, timeout: Duration) -> Self {
        Self {
            workspace,
            segmenter,
            timeout,
            locks: DashMap::new(),
            runs: AtomicU64::new(0),
        }
    }

    /// Number of times the segmenter has been started.
    pub fn segmenter_runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Return the playlist path for `song_id`, segmenting `source` first if
    /// no playlist exists yet.
    ///
    /// Preparation runs on its own task: if the caller goes away, the
    /// segmenter still finishes and later requests reuse its output.
    ///
    /// # Errors
    ///
    /// - [`Error::SegmentationFailure`] if the segmenter fails, times out, or
    ///   leaves no playlist behind.
    /// - [`Error::Io`] if the staging directory cannot be set up or published.
    pub async fn ensure_prepared(self: &Arc<Self>, song_id: SongId, source: PathBuf) -> Result<PathBuf> {
        let playlist = self.workspace.playlist_path(song_id);
        if is_file(&playlist).await {
            return Ok(playlist);
        }

        let this = Arc::clone(self);
        tokio::spawn(async move { this.prepare_locked(song_id, &source).await })
            .await
            .map_err(|e| Error::Internal(format!("preparation task failed: {e}")))?
    }

    async fn prepare_locked(&self, song_id: SongId, source: &Path) -> Result<PathBuf> {
        let lock = self.locks.entry(song_id).or_default().clone();
        let _guard = lock.lock().await;

        let dir = self.workspace.song_dir(song_id);
        let playlist = self.workspace.playlist_path(song_id);

        // Another request may have finished while we waited for the lock.
        if is_file(&playlist).await {
            return Ok(playlist);
        }

        let staging = self.workspace.staging_dir(song_id);
        remove_dir_if_present(&staging).await?;
        match tokio::fs::create_dir(&staging).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        self.runs.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            song_id = %song_id,
            segmenter = self.segmenter.name(),
            source = %source.display(),
            "Segmenting song"
        );
        let started = Instant::now();

        if let Err(e) = self.run_segmenter(song_id, source, &staging).await {
            discard(&staging).await;
            return Err(e);
        }

        // A song directory without a playlist is stale.
        remove_dir_if_present(&dir).await?;
        tokio::fs::rename(&staging, &dir).await?;

        tracing::info!(
            song_id = %song_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stream prepared"
        );
        Ok(playlist)
    }

    async fn run_segmenter(&self, song_id: SongId, source: &Path, staging: &Path) -> Result<()> {
        match tokio::time::timeout(self.timeout, self.segmenter.segment(source, staging)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(song_id = %song_id, error = %e, "Segmenter failed");
                return Err(Error::segmentation(song_id, e.to_string()));
            }
            Err(_) => {
                tracing::warn!(song_id = %song_id, timeout = ?self.timeout, "Segmenter timed out");
                return Err(Error::segmentation(
                    song_id,
                    format!("timed out after {:?}", self.timeout),
                ));
            }
        }

        if !is_file(&staging.join(PLAYLIST_FILE)).await {
            return Err(Error::segmentation(song_id, "segmenter produced no playlist"));
        }
        Ok(())
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn remove_dir_if_present(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Drop the output of a failed run. The next attempt clears it again, so a
/// failure here is only logged.
async fn discard(staging: &Path) {
    if let Err(e) = remove_dir_if_present(staging).await {
        tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging directory");
    }
}
