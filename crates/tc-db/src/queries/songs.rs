//! Song queries.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use tc_core::{AlbumId, ArtistId, Error, GenreId, LibraryFilter, Result, Song, SongId};

use crate::models::song_from_row;

const COLS: &str =
    "id, title, album_id, artist_id, genre_id, track_number, duration_secs, file_path";

/// Fields for inserting a new song.
#[derive(Debug, Clone, Default)]
pub struct NewSong<'a> {
    pub title: &'a str,
    pub album_id: Option<AlbumId>,
    pub artist_id: Option<ArtistId>,
    pub genre_id: Option<GenreId>,
    pub track_number: Option<i32>,
    pub duration_secs: Option<f64>,
    pub file_path: &'a str,
}

/// Insert a song record.
pub fn create_song(conn: &Connection, new: &NewSong<'_>) -> Result<Song> {
    conn.execute(
        "INSERT INTO songs (title, album_id, artist_id, genre_id, track_number, duration_secs, file_path)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            new.title,
            new.album_id.map(|id| id.get()),
            new.artist_id.map(|id| id.get()),
            new.genre_id.map(|id| id.get()),
            new.track_number,
            new.duration_secs,
            new.file_path,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Song {
        id: SongId::from(conn.last_insert_rowid()),
        title: new.title.to_string(),
        album_id: new.album_id,
        artist_id: new.artist_id,
        genre_id: new.genre_id,
        track_number: new.track_number,
        duration_secs: new.duration_secs,
        file_path: new.file_path.into(),
    })
}

/// Get a song by ID.
pub fn get_song(conn: &Connection, id: SongId) -> Result<Option<Song>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM songs WHERE id = ?1"),
        [id.get()],
        song_from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a song by its source file path.
pub fn get_song_by_path(conn: &Connection, path: &Path) -> Result<Option<Song>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM songs WHERE file_path = ?1"),
        [path.to_string_lossy()],
        song_from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List songs ordered by album then track number, applying any filters.
pub fn list_songs(conn: &Connection, filter: &LibraryFilter) -> Result<Vec<Song>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<i64> = Vec::new();

    if let Some(id) = filter.album_id {
        clauses.push("album_id = ?");
        params.push(id.get());
    }
    if let Some(id) = filter.artist_id {
        clauses.push("artist_id = ?");
        params.push(id.get());
    }
    if let Some(id) = filter.genre_id {
        clauses.push("genre_id = ?");
        params.push(id.get());
    }

    let mut sql = format!("SELECT {COLS} FROM songs");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY album_id, track_number, title, id");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), song_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
