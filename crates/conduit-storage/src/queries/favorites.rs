//! Queries for article favorites.

use conduit_core::errors::StorageError;
use rusqlite::{params, Connection};

use super::util::map_sqlite_err;

/// Mark `article_id` as favorited by `user_id`. Idempotent.
pub fn favorite(
    conn: &Connection,
    article_id: i64,
    user_id: i64,
    now: i64,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT OR IGNORE INTO favorites (article_id, user_id, created_at) VALUES (?1, ?2, ?3)",
    )
    .and_then(|mut stmt| stmt.execute(params![article_id, user_id, now]))
    .map_err(map_sqlite_err)?;
    Ok(())
}

/// Remove a favorite. Returns whether one existed.
pub fn unfavorite(conn: &Connection, article_id: i64, user_id: i64) -> Result<bool, StorageError> {
    let removed = conn
        .prepare_cached("DELETE FROM favorites WHERE article_id = ?1 AND user_id = ?2")
        .and_then(|mut stmt| stmt.execute(params![article_id, user_id]))
        .map_err(map_sqlite_err)?;
    Ok(removed > 0)
}

pub fn is_favorited(conn: &Connection, article_id: i64, user_id: i64) -> Result<bool, StorageError> {
    conn.prepare_cached(
        "SELECT EXISTS(SELECT 1 FROM favorites WHERE article_id = ?1 AND user_id = ?2)",
    )
    .and_then(|mut stmt| stmt.query_row(params![article_id, user_id], |row| row.get(0)))
    .map_err(map_sqlite_err)
}

pub fn favorites_count(conn: &Connection, article_id: i64) -> Result<i64, StorageError> {
    conn.prepare_cached("SELECT COUNT(*) FROM favorites WHERE article_id = ?1")
        .and_then(|mut stmt| stmt.query_row(params![article_id], |row| row.get(0)))
        .map_err(map_sqlite_err)
}
