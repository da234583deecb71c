//! Genre queries.

use rusqlite::{Connection, OptionalExtension};
use tc_core::{Error, Genre, GenreId, Result};

use crate::models::genre_from_row;

/// Create a genre, or return the existing one with the same name.
pub fn get_or_create_genre(conn: &Connection, name: &str) -> Result<Genre> {
    conn.execute("INSERT OR IGNORE INTO genres (name) VALUES (?1)", [name])
        .map_err(|e| Error::database(e.to_string()))?;
    conn.query_row(
        "SELECT id, name FROM genres WHERE name = ?1",
        [name],
        genre_from_row,
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a genre by ID.
pub fn get_genre(conn: &Connection, id: GenreId) -> Result<Option<Genre>> {
    conn.query_row(
        "SELECT id, name FROM genres WHERE id = ?1",
        [id.get()],
        genre_from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List all genres ordered by name.
pub fn list_genres(conn: &Connection) -> Result<Vec<Genre>> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM genres ORDER BY name")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], genre_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
