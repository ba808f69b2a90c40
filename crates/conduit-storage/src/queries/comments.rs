//! Queries for article comments.

use conduit_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::users::ProfileView;
use super::util::map_sqlite_err;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A comment joined with its author's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: CommentRow,
    pub author: ProfileView,
}

const VIEW_SELECT: &str = "SELECT c.id, c.article_id, c.author_id, c.body, c.created_at, c.updated_at,
        u.username, u.bio, u.image,
        EXISTS(SELECT 1 FROM follows f WHERE f.follower_id = ?1 AND f.followee_id = c.author_id)
    FROM comments c JOIN users u ON u.id = c.author_id";

fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        article_id: row.get(1)?,
        author_id: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn row_to_view(row: &Row<'_>) -> rusqlite::Result<CommentView> {
    Ok(CommentView {
        comment: row_to_comment(row)?,
        author: ProfileView {
            username: row.get(6)?,
            bio: row.get(7)?,
            image: row.get(8)?,
            following: row.get(9)?,
        },
    })
}

/// Insert a comment. Returns the new row id.
pub fn insert_comment(
    conn: &Connection,
    article_id: i64,
    author_id: i64,
    body: &str,
    now: i64,
) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO comments (article_id, author_id, body, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .and_then(|mut stmt| stmt.execute(params![article_id, author_id, body, now]))
    .map_err(map_sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_comment(conn: &Connection, id: i64) -> Result<Option<CommentRow>, StorageError> {
    conn.prepare_cached(
        "SELECT id, article_id, author_id, body, created_at, updated_at FROM comments WHERE id = ?1",
    )
    .and_then(|mut stmt| stmt.query_row(params![id], row_to_comment).optional())
    .map_err(map_sqlite_err)
}

/// A single comment with its author profile relative to `viewer`.
pub fn view_comment(
    conn: &Connection,
    id: i64,
    viewer: Option<i64>,
) -> Result<Option<CommentView>, StorageError> {
    let sql = format!("{VIEW_SELECT} WHERE c.id = ?2");
    conn.prepare_cached(&sql)
        .and_then(|mut stmt| stmt.query_row(params![viewer, id], row_to_view).optional())
        .map_err(map_sqlite_err)
}

/// Delete a comment. Returns whether a row was removed.
pub fn delete_comment(conn: &Connection, id: i64) -> Result<bool, StorageError> {
    let removed = conn
        .prepare_cached("DELETE FROM comments WHERE id = ?1")
        .and_then(|mut stmt| stmt.execute(params![id]))
        .map_err(map_sqlite_err)?;
    Ok(removed > 0)
}

/// All comments on an article, oldest first.
pub fn comments_for_article(
    conn: &Connection,
    article_id: i64,
    viewer: Option<i64>,
) -> Result<Vec<CommentView>, StorageError> {
    let sql = format!("{VIEW_SELECT} WHERE c.article_id = ?2 ORDER BY c.id");
    let mut stmt = conn.prepare_cached(&sql).map_err(map_sqlite_err)?;
    let rows = stmt
        .query_map(params![viewer, article_id], row_to_view)
        .map_err(map_sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_sqlite_err)
}
