//! Album queries.

use rusqlite::{Connection, OptionalExtension};
use tc_core::{Album, AlbumId, ArtistId, Error, GenreId, LibraryFilter, Result};

use crate::models::album_from_row;

const COLS: &str = "id, title, artist_id, genre_id, year";

/// Find an album by title and artist, creating it if missing.
pub fn get_or_create_album(
    conn: &Connection,
    title: &str,
    artist_id: Option<ArtistId>,
) -> Result<Album> {
    let artist = artist_id.map(|id| id.get());
    let existing = conn
        .query_row(
            &format!("SELECT {COLS} FROM albums WHERE title = ?1 AND artist_id IS ?2"),
            rusqlite::params![title, artist],
            album_from_row,
        )
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;
    if let Some(album) = existing {
        return Ok(album);
    }

    conn.execute(
        "INSERT INTO albums (title, artist_id) VALUES (?1, ?2)",
        rusqlite::params![title, artist],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Album {
        id: AlbumId::from(conn.last_insert_rowid()),
        title: title.to_string(),
        artist_id,
        genre_id: None,
        year: None,
    })
}

/// Set an album's genre.
pub fn set_album_genre(conn: &Connection, id: AlbumId, genre_id: GenreId) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE albums SET genre_id = ?1 WHERE id = ?2",
            [genre_id.get(), id.get()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Get an album by ID.
pub fn get_album(conn: &Connection, id: AlbumId) -> Result<Option<Album>> {
    conn.query_row(
        &format!("SELECT {COLS} FROM albums WHERE id = ?1"),
        [id.get()],
        album_from_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List albums ordered by title, applying any filters.
pub fn list_albums(conn: &Connection, filter: &LibraryFilter) -> Result<Vec<Album>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<i64> = Vec::new();

    if let Some(id) = filter.album_id {
        clauses.push("id = ?");
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

    let mut sql = format!("SELECT {COLS} FROM albums");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY title, id");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), album_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{artists, genres};

    #[test]
    fn crud_and_filters() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let miles = artists::get_or_create_artist(&conn, "Miles Davis").unwrap();
        let jazz = genres::get_or_create_genre(&conn, "Jazz").unwrap();

        let blue = get_or_create_album(&conn, "Kind of Blue", Some(miles.id)).unwrap();
        let same = get_or_create_album(&conn, "Kind of Blue", Some(miles.id)).unwrap();
        assert_eq!(blue.id, same.id);

        let orphan = get_or_create_album(&conn, "Unknown Album", None).unwrap();
        assert_eq!(
            get_or_create_album(&conn, "Unknown Album", None).unwrap().id,
            orphan.id
        );

        assert!(set_album_genre(&conn, blue.id, jazz.id).unwrap());
        let fetched = get_album(&conn, blue.id).unwrap().unwrap();
        assert_eq!(fetched.genre_id, Some(jazz.id));

        let all = list_albums(&conn, &LibraryFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let by_artist = list_albums(
            &conn,
            &LibraryFilter {
                artist_id: Some(miles.id),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(by_artist.len(), 1);
        assert_eq!(by_artist[0].title, "Kind of Blue");

        let none = list_albums(
            &conn,
            &LibraryFilter {
                artist_id: Some(miles.id),
                genre_id: Some(GenreId::from(999)),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(none.is_empty());

        assert!(get_album(&conn, AlbumId::from(999)).unwrap().is_none());
    }
}
