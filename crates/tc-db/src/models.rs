//! Row mappers from `rusqlite::Row` to the library models in `tc-core`.
//!
//! Column order must match the `COLS` constant of the corresponding query
//! module.

use std::path::PathBuf;

use tc_core::{Album, AlbumId, Artist, ArtistId, Genre, GenreId, Song, SongId};

fn opt_id<T: From<i64>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let v: Option<i64> = row.get(idx)?;
    Ok(v.map(T::from))
}

pub fn genre_from_row(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: GenreId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
    })
}

pub fn artist_from_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: ArtistId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
    })
}

pub fn album_from_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: AlbumId::from(row.get::<_, i64>(0)?),
        title: row.get(1)?,
        artist_id: opt_id(row, 2)?,
        genre_id: opt_id(row, 3)?,
        year: row.get(4)?,
    })
}

pub fn song_from_row(row: &rusqlite::Row) -> rusqlite::Result<Song> {
    let path: String = row.get(7)?;
    Ok(Song {
        id: SongId::from(row.get::<_, i64>(0)?),
        title: row.get(1)?,
        album_id: opt_id(row, 2)?,
        artist_id: opt_id(row, 3)?,
        genre_id: opt_id(row, 4)?,
        track_number: row.get(5)?,
        duration_secs: row.get(6)?,
        file_path: PathBuf::from(path),
    })
}
