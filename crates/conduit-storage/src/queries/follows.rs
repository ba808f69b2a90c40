//! Queries for the follow graph.

use conduit_core::errors::StorageError;
use rusqlite::{params, Connection};

use super::util::map_sqlite_err;

/// Record that `follower_id` follows `followee_id`. Idempotent.
pub fn follow(
    conn: &Connection,
    follower_id: i64,
    followee_id: i64,
    now: i64,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT OR IGNORE INTO follows (follower_id, followee_id, created_at)
         VALUES (?1, ?2, ?3)",
    )
    .and_then(|mut stmt| stmt.execute(params![follower_id, followee_id, now]))
    .map_err(map_sqlite_err)?;
    Ok(())
}

/// Remove a follow edge. Returns whether an edge existed.
pub fn unfollow(conn: &Connection, follower_id: i64, followee_id: i64) -> Result<bool, StorageError> {
    let removed = conn
        .prepare_cached("DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2")
        .and_then(|mut stmt| stmt.execute(params![follower_id, followee_id]))
        .map_err(map_sqlite_err)?;
    Ok(removed > 0)
}

pub fn is_following(
    conn: &Connection,
    follower_id: i64,
    followee_id: i64,
) -> Result<bool, StorageError> {
    conn.prepare_cached(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND followee_id = ?2)",
    )
    .and_then(|mut stmt| stmt.query_row(params![follower_id, followee_id], |row| row.get(0)))
    .map_err(map_sqlite_err)
}

/// Ids of every user `follower_id` follows, ascending.
pub fn following_ids(conn: &Connection, follower_id: i64) -> Result<Vec<i64>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT followee_id FROM follows WHERE follower_id = ?1 ORDER BY followee_id",
        )
        .map_err(map_sqlite_err)?;
    let rows = stmt
        .query_map(params![follower_id], |row| row.get(0))
        .map_err(map_sqlite_err)?;
    rows.collect::<Result<Vec<i64>, _>>().map_err(map_sqlite_err)
}
