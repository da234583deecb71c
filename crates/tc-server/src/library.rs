//! Bridges async handlers to the blocking SQLite library store.

use rusqlite::Connection;
use tc_core::{Error, Result, Song, SongId};
use tc_db::pool::DbPool;

/// Run `f` with a pooled connection on the blocking thread pool.
pub async fn with_conn<T, F>(db: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || {
        let conn = tc_db::pool::get_conn(&db)?;
        f(&conn)
    })
    .await
    .map_err(|e| Error::Internal(format!("spawn_blocking join error: {e}")))?
}

/// Resolve a song id to its library record, `None` if it does not exist.
pub async fn lookup_song(db: &DbPool, id: SongId) -> Result<Option<Song>> {
    with_conn(db, move |conn| tc_db::queries::songs::get_song(conn, id)).await
}
