//! Integration tests for the HLS stream routes.

mod common;

use common::{segment_bytes, FakeSegmenter, TestHarness};
use std::path::Path;
use tc_core::SongId;

#[tokio::test]
async fn playlist_then_segment() {
    let h = TestHarness::with_server().await;
    let id = h.create_song_with_id(42, "So What", "/music/42.mp3");

    let resp = h.get("/songs/42/stream").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "application/x-mpegURL"
    );
    let playlist = resp.text().await.unwrap();
    assert!(playlist.starts_with("#EXTM3U"));
    assert!(playlist.contains("fileSequence0.aac"));
    assert!(h.song_dir(id).join("prog_index.m3u8").is_file());

    let resp = h.get("/songs/42/fileSequence0.aac").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "audio/aac"
    );
    assert_eq!(
        resp.headers().get("accept-ranges").unwrap().to_str().unwrap(),
        "bytes"
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), segment_bytes(Path::new("/music/42.mp3"), 0));

    assert_eq!(h.segmenter.calls(), 1);
}

#[tokio::test]
async fn repeated_playlist_requests_segment_once() {
    let h = TestHarness::with_server().await;
    let song = h.create_song("Blue in Green", "/music/blue.m4a");
    let path = format!("/songs/{}/stream", song.id);

    let first = h.get(&path).await.text().await.unwrap();
    let second = h.get(&path).await.text().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.segmenter.calls(), 1);
    assert_eq!(h.ctx.preparer.segmenter_runs(), 1);
}

#[tokio::test]
async fn segment_range_request() {
    let h = TestHarness::with_server().await;
    let song = h.create_song("All Blues", "/music/all_blues.mp3");
    h.get(&format!("/songs/{}/stream", song.id)).await;

    let full = segment_bytes(Path::new("/music/all_blues.mp3"), 1);
    let resp = reqwest::Client::new()
        .get(h.url(&format!("/songs/{}/fileSequence1.aac", song.id)))
        .header("Range", "bytes=0-4")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        format!("bytes 0-4/{}", full.len())
    );
    assert_eq!(resp.bytes().await.unwrap().as_ref(), &full[..5]);

    let resp = reqwest::Client::new()
        .get(h.url(&format!("/songs/{}/fileSequence1.aac", song.id)))
        .header("Range", format!("bytes={}-", full.len() + 10))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
}

#[tokio::test]
async fn missing_song_is_404_without_preparation() {
    let h = TestHarness::with_server().await;

    let resp = h.get("/songs/999/stream").await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["errors"][0]["code"], "not_found");

    let resp = h.get("/songs/999/fileSequence0.aac").await;
    assert_eq!(resp.status(), 404);

    assert_eq!(h.segmenter.calls(), 0);
    assert!(!h.song_dir(SongId::from(999)).exists());
}

#[tokio::test]
async fn segment_before_playlist_is_404() {
    let h = TestHarness::with_server().await;
    let song = h.create_song("Flamenco Sketches", "/music/flamenco.mp3");

    let resp = h.get(&format!("/songs/{}/fileSequence0.aac", song.id)).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(h.segmenter.calls(), 0);
}

#[tokio::test]
async fn traversal_attempts_are_rejected() {
    let h = TestHarness::with_server().await;
    let song = h.create_song("Freddie Freeloader", "/music/freddie.mp3");
    h.get(&format!("/songs/{}/stream", song.id)).await;

    // A file next to the workspace that must stay unreachable.
    let outside = h.workspace_path.parent().unwrap().join("secret.aac");
    let _ = std::fs::write(&outside, b"secret");

    for segment in [
        "..%2F..%2Fsecret.aac",
        "..%2Fprog_index.m3u8",
        "%2Fetc%2Fpasswd",
        "..%5Csecret.aac",
        ".hidden.aac",
    ] {
        let resp = h.get(&format!("/songs/{}/{segment}", song.id)).await;
        assert_eq!(resp.status(), 400, "{segment} should be rejected");
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["errors"][0]["code"], "invalid_path");
    }

    let _ = std::fs::remove_file(&outside);
}

#[tokio::test]
async fn non_segment_names_are_404() {
    let h = TestHarness::with_server().await;
    let song = h.create_song("So What", "/music/so_what.mp3");
    h.get(&format!("/songs/{}/stream", song.id)).await;

    for segment in ["prog_index.m3u8", "fileSequence.aac", "fileSequence1.ts"] {
        let resp = h.get(&format!("/songs/{}/{segment}", song.id)).await;
        assert_eq!(resp.status(), 404, "{segment} should not be served");
    }
}

#[tokio::test]
async fn segmentation_failure_is_500_with_generic_detail() {
    let h = TestHarness::with_segmenter(FakeSegmenter::failing()).await;
    let song = h.create_song("Broken", "/music/broken.mp3");

    let resp = h.get(&format!("/songs/{}/stream", song.id)).await;
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["errors"][0]["code"], "segmentation_failure");
    assert_eq!(
        body["errors"][0]["detail"],
        "There is an error processing the request."
    );
    assert!(!body.to_string().contains("broken.mp3"));

    // Nothing is cached after a failure; the next request tries again.
    h.get(&format!("/songs/{}/stream", song.id)).await;
    assert_eq!(h.segmenter.calls(), 2);
}
