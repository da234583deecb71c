//! Graceful shutdown: draining, workspace removal, refusing new connections.

mod common;

use std::time::Duration;

use common::{FakeSegmenter, TestHarness};
use tc_core::config::Config;
use tc_server::lifecycle::LifecyclePhase;

#[tokio::test]
async fn shutdown_removes_workspace() {
    let h = TestHarness::with_server().await;
    let song = h.create_song("So What", "/music/so_what.mp3");
    assert_eq!(h.get(&format!("/songs/{}/stream", song.id)).await.status(), 200);

    let workspace = h.workspace_path.clone();
    let song_dir = h.song_dir(song.id);
    assert!(song_dir.join("fileSequence0.aac").is_file());
    let addr = h.addr;
    let mut phases = h.phases.clone();

    h.shutdown().await;

    assert_eq!(*phases.borrow_and_update(), LifecyclePhase::Stopped);
    assert!(!workspace.exists());
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn in_flight_preparation_drains_before_exit() {
    let h = TestHarness::with_segmenter(FakeSegmenter::new(Duration::from_millis(300))).await;
    let song = h.create_song("Naima", "/music/naima.mp3");
    let url = h.url(&format!("/songs/{}/stream", song.id));

    let request = tokio::spawn(async move { reqwest::get(url).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let workspace = h.workspace_path.clone();
    let addr = h.addr;
    h.begin_shutdown();

    let resp = request.await.unwrap().unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().starts_with("#EXTM3U"));

    // Stopped listening while the request was still running.
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());

    h.shutdown().await;
    assert!(!workspace.exists());
}

#[tokio::test]
async fn grace_period_caps_the_drain() {
    let mut config = Config::default();
    config.server.shutdown_grace_secs = 1;
    let h = TestHarness::start(config, FakeSegmenter::new(Duration::from_secs(30))).await;
    let song = h.create_song("Ascension", "/music/ascension.mp3");
    let url = h.url(&format!("/songs/{}/stream", song.id));

    let _request = tokio::spawn(async move { reqwest::get(url).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let workspace = h.workspace_path.clone();
    tokio::time::timeout(Duration::from_secs(5), h.shutdown())
        .await
        .expect("shutdown should not wait for the stuck request");

    assert!(!workspace.exists());
}
