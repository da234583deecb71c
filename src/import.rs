//! Library import.
//!
//! Walks a directory tree and registers every audio file as a song. The
//! directory layout supplies the metadata:
//!
//! ```text
//! <root>/<Artist>/<Album>/<NN Title>.<ext>
//! ```
//!
//! Files that are already in the library (same path) are skipped, so an
//! import can be re-run over a growing collection.

use std::path::{Component, Path};

use anyhow::{Context, Result};
use tc_core::{ArtistId, Genre};
use tc_db::pool::DbPool;
use tc_db::queries::{albums, artists, genres, songs};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions the segmenters accept.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "wav", "aif", "aiff", "flac", "caf"];

/// Outcome of an import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Check whether a path has a supported audio extension.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Split a file stem like `"03 - Blue in Green"` into track number and title.
///
/// Only a leading run of up to three digits followed by a separator counts
/// as a track number, so titles such as `"1999"` survive intact.
pub fn parse_track_stem(stem: &str) -> (Option<i32>, String) {
    let digits = stem.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 3 {
        return (None, stem.trim().to_string());
    }

    let rest = &stem[digits..];
    if !rest.starts_with([' ', '-', '.', '_']) {
        return (None, stem.trim().to_string());
    }

    let title = rest.trim_start_matches([' ', '-', '.', '_']).trim();
    if title.is_empty() {
        return (None, stem.trim().to_string());
    }

    (stem[..digits].parse().ok(), title.to_string())
}

/// Artist and album names taken from the directories between `root` and the
/// file: the nearest directory is the album, the one above it the artist.
fn layout_names(root: &Path, file: &Path) -> (Option<String>, Option<String>) {
    let dirs: Vec<String> = file
        .strip_prefix(root)
        .ok()
        .and_then(Path::parent)
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let mut names = dirs.into_iter().rev();
    let album = names.next();
    let artist = names.next();
    (artist, album)
}

/// Import every audio file below `root` into the library.
///
/// When `genre` is given, every imported song and its album are assigned to
/// that genre.
pub fn import_directory(pool: &DbPool, root: &Path, genre: Option<&str>) -> Result<ImportSummary> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Cannot read import directory {}", root.display()))?;
    info!("Importing from {}", root.display());

    let conn = tc_db::pool::get_conn(pool)?;
    let genre: Option<Genre> = genre
        .map(|name| genres::get_or_create_genre(&conn, name))
        .transpose()?;

    let mut summary = ImportSummary::default();

    for entry in WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio_file(path) {
            continue;
        }

        if songs::get_song_by_path(&conn, path)?.is_some() {
            debug!("Already in library: {}", path.display());
            summary.skipped += 1;
            continue;
        }

        match import_file(&conn, &root, path, genre.as_ref()) {
            Ok(()) => summary.added += 1,
            Err(e) => {
                warn!("Failed to import {}: {e}", path.display());
                summary.failed += 1;
            }
        }
    }

    info!(
        added = summary.added,
        skipped = summary.skipped,
        failed = summary.failed,
        "Import complete"
    );
    Ok(summary)
}

fn import_file(
    conn: &rusqlite::Connection,
    root: &Path,
    path: &Path,
    genre: Option<&Genre>,
) -> Result<()> {
    let file_path = path
        .to_str()
        .with_context(|| format!("Path is not valid UTF-8: {}", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (track_number, title) = parse_track_stem(&stem);
    let (artist_name, album_title) = layout_names(root, path);

    let artist_id: Option<ArtistId> = artist_name
        .as_deref()
        .map(|name| artists::get_or_create_artist(conn, name))
        .transpose()?
        .map(|a| a.id);

    let album = album_title
        .as_deref()
        .map(|title| albums::get_or_create_album(conn, title, artist_id))
        .transpose()?;

    if let (Some(album), Some(genre)) = (&album, genre) {
        if album.genre_id.is_none() {
            albums::set_album_genre(conn, album.id, genre.id)?;
        }
    }

    let song = songs::create_song(
        conn,
        &songs::NewSong {
            title: &title,
            album_id: album.as_ref().map(|a| a.id),
            artist_id,
            genre_id: genre.map(|g| g.id),
            track_number,
            duration_secs: None,
            file_path,
        },
    )?;
    debug!(song_id = %song.id, "Imported {}", path.display());
    Ok(())
}
