//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds an in-memory library, a fresh
//! stream workspace and a full [`AppContext`], then runs the router under
//! the real [`Lifecycle`] on a random port. A [`FakeSegmenter`] stands in
//! for the external tool and counts its invocations.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tc_av::{Segmenter, StreamWorkspace, PLAYLIST_FILE};
use tc_core::config::Config;
use tc_core::{Error, Song, SongId};
use tc_db::pool::{init_memory_pool, DbPool};
use tc_db::queries::songs::{create_song, NewSong};
use tc_server::context::AppContext;
use tc_server::lifecycle::{Lifecycle, LifecyclePhase};
use tc_server::router::build_router;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Segments written per song.
pub const SEGMENTS: usize = 2;

/// Writes a deterministic playlist and segments derived from the source path.
pub struct FakeSegmenter {
    delay: Duration,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeSegmenter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Segmenter for FakeSegmenter {
    fn name(&self) -> &str {
        "fake"
    }

    async fn segment(&self, source: &Path, output_dir: &Path) -> tc_core::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(Error::tool("fake", format!("cannot decode {}", source.display())));
        }

        let mut playlist = String::from(
            "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:0\n",
        );
        for i in 0..SEGMENTS {
            let name = format!("fileSequence{i}.aac");
            tokio::fs::write(output_dir.join(&name), segment_bytes(source, i)).await?;
            playlist.push_str(&format!("#EXTINF:10.0,\n{name}\n"));
        }
        playlist.push_str("#EXT-X-ENDLIST\n");
        tokio::fs::write(output_dir.join(PLAYLIST_FILE), playlist).await?;
        Ok(())
    }
}

/// Content the fake segmenter writes for segment `index` of `source`.
pub fn segment_bytes(source: &Path, index: usize) -> Vec<u8> {
    format!("ADTS segment {index} of {}", source.display()).into_bytes()
}

/// Test harness wrapping a running server backed by an in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub addr: SocketAddr,
    pub segmenter: Arc<FakeSegmenter>,
    pub workspace_path: PathBuf,
    pub phases: watch::Receiver<LifecyclePhase>,
    shutdown: CancellationToken,
    server: JoinHandle<()>,
}

impl TestHarness {
    /// Start a server whose segmenter finishes immediately.
    pub async fn with_server() -> Self {
        Self::with_segmenter(FakeSegmenter::new(Duration::ZERO)).await
    }

    /// Start a server around the given fake segmenter.
    pub async fn with_segmenter(segmenter: FakeSegmenter) -> Self {
        Self::start(Config::default(), segmenter).await
    }

    /// Start a server with a custom configuration.
    pub async fn start(config: Config, segmenter: FakeSegmenter) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let workspace = StreamWorkspace::create(config.stream.workspace_root.as_deref())
            .expect("failed to create workspace");
        let workspace_path = workspace.path().to_path_buf();
        let segmenter = Arc::new(segmenter);

        let ctx = AppContext::new(
            db.clone(),
            workspace.layout(),
            segmenter.clone(),
            config.stream.segment_timeout(),
        );
        let app = build_router(ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        let lifecycle = Lifecycle::new(config.server.shutdown_grace());
        let shutdown = lifecycle.shutdown_token();
        let mut phases = lifecycle.subscribe();
        let server = tokio::spawn(lifecycle.run(listener, app, workspace));
        phases
            .wait_for(|p| *p == LifecyclePhase::Serving)
            .await
            .expect("server never started serving");

        Self {
            ctx,
            db,
            addr,
            segmenter,
            workspace_path,
            phases,
            shutdown,
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(self.url(path)).await.expect("request failed")
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> tc_db::pool::PooledConnection {
        tc_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Insert a song with no album, artist or genre.
    pub fn create_song(&self, title: &str, file_path: &str) -> Song {
        create_song(
            &self.conn(),
            &NewSong {
                title,
                file_path,
                ..Default::default()
            },
        )
        .expect("failed to create song")
    }

    /// Insert a song under a fixed id.
    pub fn create_song_with_id(&self, id: i64, title: &str, file_path: &str) -> SongId {
        self.conn()
            .execute(
                "INSERT INTO songs (id, title, file_path) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, title, file_path],
            )
            .expect("failed to insert song");
        SongId::from(id)
    }

    pub fn song_dir(&self, id: SongId) -> PathBuf {
        self.workspace_path.join(id.to_string())
    }

    /// Trigger a graceful shutdown without waiting for it.
    pub fn begin_shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Shut down and wait until the lifecycle has stopped.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        self.server.await.expect("server task panicked");
    }
}
