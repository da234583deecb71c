//! Artist queries.

use rusqlite::{Connection, OptionalExtension};
use tc_core::{Artist, ArtistId, Error, LibraryFilter, Result};

use crate::models::artist_from_row;

/// Create an artist, or return the existing one with the same name.
pub fn get_or_create_artist(conn: &Connection, name: &str) -> Result<Artist> {
    conn.execute("INSERT OR IGNORE INTO artists (name) VALUES (?1)", [name])
        .map_err(|e| Error::database(e.to_string()))?;
    conn.query_row(
        "SELECT id, name FROM artists WHERE name = ?1",
        [name],
        artist_from_row,
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Get an artist by ID.
pub fn get_artist(conn: &Connection, id: ArtistId) -> Result<Option<Artist>> {
    conn.query_row(
        "SELECT id, name FROM artists WHERE id = ?1",
        [id.get()],
        artist_from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List artists ordered by name.
///
/// `album_id` selects the album's artist; `genre_id` selects artists with at
/// least one album or song in that genre.
pub fn list_artists(conn: &Connection, filter: &LibraryFilter) -> Result<Vec<Artist>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<i64> = Vec::new();

    if let Some(id) = filter.artist_id {
        clauses.push("id = ?");
        params.push(id.get());
    }
    if let Some(id) = filter.album_id {
        clauses.push("id IN (SELECT artist_id FROM albums WHERE id = ?)");
        params.push(id.get());
    }
    if let Some(id) = filter.genre_id {
        clauses.push(
            "id IN (SELECT artist_id FROM albums WHERE genre_id = ?
                    UNION SELECT artist_id FROM songs WHERE genre_id = ?)",
        );
        params.push(id.get());
        params.push(id.get());
    }

    let mut sql = String::from("SELECT id, name FROM artists");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY name");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), artist_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}
