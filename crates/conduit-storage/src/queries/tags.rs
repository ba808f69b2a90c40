//! Queries for tags and article/tag links.

use std::collections::{HashMap, HashSet};

use conduit_core::errors::StorageError;
use rusqlite::{params, params_from_iter, Connection};

use super::util::map_sqlite_err;

/// Replace the tag links of an article.
///
/// Tags are trimmed; empty and duplicate entries are skipped, and the first
/// occurrence keeps its position. Missing tags are created.
pub fn set_article_tags(
    conn: &Connection,
    article_id: i64,
    tags: &[String],
) -> Result<(), StorageError> {
    conn.prepare_cached("DELETE FROM article_tags WHERE article_id = ?1")
        .and_then(|mut stmt| stmt.execute(params![article_id]))
        .map_err(map_sqlite_err)?;

    let mut seen = HashSet::new();
    let mut position: i64 = 0;
    for tag in tags.iter().map(|t| t.trim()) {
        if tag.is_empty() || !seen.insert(tag) {
            continue;
        }

        conn.prepare_cached("INSERT OR IGNORE INTO tags (tag) VALUES (?1)")
            .and_then(|mut stmt| stmt.execute(params![tag]))
            .map_err(map_sqlite_err)?;

        conn.prepare_cached(
            "INSERT INTO article_tags (article_id, tag_id, position)
             SELECT ?1, id, ?2 FROM tags WHERE tag = ?3",
        )
        .and_then(|mut stmt| stmt.execute(params![article_id, position, tag]))
        .map_err(map_sqlite_err)?;
        position += 1;
    }
    Ok(())
}

/// Tags of one article, in the order they were supplied.
pub fn tags_for_article(conn: &Connection, article_id: i64) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT t.tag FROM article_tags at
             JOIN tags t ON t.id = at.tag_id
             WHERE at.article_id = ?1
             ORDER BY at.position",
        )
        .map_err(map_sqlite_err)?;
    let rows = stmt
        .query_map(params![article_id], |row| row.get(0))
        .map_err(map_sqlite_err)?;
    rows.collect::<Result<Vec<String>, _>>().map_err(map_sqlite_err)
}

/// Tags for a batch of articles in one statement, keyed by article id.
/// Articles without tags are absent from the map.
pub fn tags_for_articles(
    conn: &Connection,
    article_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, StorageError> {
    let mut map: HashMap<i64, Vec<String>> = HashMap::new();
    if article_ids.is_empty() {
        return Ok(map);
    }

    let placeholders = vec!["?"; article_ids.len()].join(", ");
    let sql = format!(
        "SELECT at.article_id, t.tag FROM article_tags at
         JOIN tags t ON t.id = at.tag_id
         WHERE at.article_id IN ({placeholders})
         ORDER BY at.article_id, at.position"
    );
    let mut stmt = conn.prepare(&sql).map_err(map_sqlite_err)?;
    let rows = stmt
        .query_map(params_from_iter(article_ids.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(map_sqlite_err)?;
    for row in rows {
        let (article_id, tag) = row.map_err(map_sqlite_err)?;
        map.entry(article_id).or_default().push(tag);
    }
    Ok(map)
}

/// Every known tag, oldest first.
pub fn all_tags(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT tag FROM tags ORDER BY id")
        .map_err(map_sqlite_err)?;
    let rows = stmt.query_map([], |row| row.get(0)).map_err(map_sqlite_err)?;
    rows.collect::<Result<Vec<String>, _>>().map_err(map_sqlite_err)
}
