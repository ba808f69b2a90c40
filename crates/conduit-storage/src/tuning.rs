//! Index tuning: the performance index catalog, its idempotent application,
//! verification, and statistics refresh.

use conduit_core::errors::StorageError;
use rusqlite::Connection;
use serde::Serialize;

use crate::queries::util::map_sqlite_err;

/// One secondary index in the tuning catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub table: &'static str,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Indexes backing the listing, feed, comment and favorite-count queries.
/// Unique columns (slug, email, username, tag) are already covered by their
/// implicit unique indexes.
pub const PERFORMANCE_INDEXES: &[IndexSpec] = &[
    IndexSpec {
        table: "articles",
        name: "idx_articles_created_at",
        sql: "CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles(created_at DESC, id DESC)",
    },
    IndexSpec {
        table: "articles",
        name: "idx_articles_author_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_articles_author_id ON articles(author_id)",
    },
    IndexSpec {
        table: "comments",
        name: "idx_comments_article_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_comments_article_id ON comments(article_id)",
    },
    IndexSpec {
        table: "comments",
        name: "idx_comments_author_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_comments_author_id ON comments(author_id)",
    },
    IndexSpec {
        table: "favorites",
        name: "idx_favorites_article_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_favorites_article_id ON favorites(article_id)",
    },
    IndexSpec {
        table: "favorites",
        name: "idx_favorites_user_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_favorites_user_id ON favorites(user_id)",
    },
    IndexSpec {
        table: "article_tags",
        name: "idx_article_tags_tag_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_article_tags_tag_id ON article_tags(tag_id)",
    },
    IndexSpec {
        table: "follows",
        name: "idx_follows_followee_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_follows_followee_id ON follows(followee_id)",
    },
];

/// Outcome of applying the catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TuningReport {
    pub created: Vec<String>,
    /// (index name, error message)
    pub failed: Vec<(String, String)>,
}

impl TuningReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Effective connection settings, as reported by SQLite.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSettings {
    pub journal_mode: String,
    pub synchronous: i64,
    pub cache_size: i64,
    pub busy_timeout_ms: i64,
    pub foreign_keys: bool,
}

/// Create every catalog index. A failing index is logged and recorded;
/// the rest are still attempted.
pub fn apply_performance_indexes(conn: &Connection) -> TuningReport {
    apply_indexes(conn, PERFORMANCE_INDEXES)
}

/// Create each index in `specs`, collecting successes and failures.
pub fn apply_indexes(conn: &Connection, specs: &[IndexSpec]) -> TuningReport {
    let mut report = TuningReport::default();
    for spec in specs {
        match conn.execute_batch(spec.sql) {
            Ok(()) => {
                tracing::info!(index = spec.name, table = spec.table, "index ready");
                report.created.push(spec.name.to_string());
            }
            Err(e) => {
                tracing::warn!(index = spec.name, table = spec.table, error = %e, "index creation failed");
                report.failed.push((spec.name.to_string(), e.to_string()));
            }
        }
    }
    report
}

/// Names of all custom (`idx_` prefixed) indexes, sorted.
pub fn list_custom_indexes(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'index' AND name LIKE 'idx\\_%' ESCAPE '\\'
             ORDER BY name",
        )
        .map_err(map_sqlite_err)?;
    let rows = stmt.query_map([], |row| row.get(0)).map_err(map_sqlite_err)?;
    rows.collect::<Result<Vec<String>, _>>().map_err(map_sqlite_err)
}

/// Refresh planner statistics.
pub fn analyze(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("ANALYZE; PRAGMA optimize;")
        .map_err(map_sqlite_err)
}

/// Report the pragmas that govern connection behavior.
pub fn pool_settings(conn: &Connection) -> Result<PoolSettings, StorageError> {
    let pragma_i64 = |name: &str| -> Result<i64, StorageError> {
        conn.pragma_query_value(None, name, |row| row.get(0))
            .map_err(map_sqlite_err)
    };

    let journal_mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(map_sqlite_err)?;

    Ok(PoolSettings {
        journal_mode,
        synchronous: pragma_i64("synchronous")?,
        cache_size: pragma_i64("cache_size")?,
        busy_timeout_ms: pragma_i64("busy_timeout")?,
        foreign_keys: pragma_i64("foreign_keys")? != 0,
    })
}
