//! Queries for articles: CRUD, the filtered listing and the follow feed.
//!
//! Listing and feed share one projection. It carries the author profile,
//! `favorited` and `following` relative to the viewer, and the favorite
//! count, all aggregated in a single statement. The viewer is always bound
//! as `?1` (NULL for anonymous viewers, which makes both flags false).

use conduit_core::errors::StorageError;
use conduit_core::slug::slugify;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::tags::tags_for_articles;
use super::users::ProfileView;
use super::util::map_sqlite_err;
use crate::pagination::{PageRequest, PaginatedResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields required to create an article. The slug is derived from `title`.
#[derive(Debug, Clone)]
pub struct NewArticle<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub body: &'a str,
    pub author_id: i64,
}

/// Partial update; `None` leaves the column untouched. A new title also
/// regenerates the slug.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

/// An article joined with everything a response needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub article: ArticleRow,
    pub author: ProfileView,
    pub tags: Vec<String>,
    pub favorited: bool,
    pub favorites_count: i64,
}

/// Optional listing filters, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Only articles carrying this tag.
    pub tag: Option<String>,
    /// Only articles written by this username.
    pub author: Option<String>,
    /// Only articles favorited by this username.
    pub favorited: Option<String>,
}

const VIEW_SELECT: &str = "SELECT a.id, a.slug, a.title, a.description, a.body, a.author_id,
        a.created_at, a.updated_at,
        u.username, u.bio, u.image,
        EXISTS(SELECT 1 FROM follows f WHERE f.follower_id = ?1 AND f.followee_id = a.author_id),
        EXISTS(SELECT 1 FROM favorites fv WHERE fv.article_id = a.id AND fv.user_id = ?1),
        (SELECT COUNT(*) FROM favorites fc WHERE fc.article_id = a.id)
    FROM articles a JOIN users u ON u.id = a.author_id";

const ORDER_BY: &str = "ORDER BY a.created_at DESC, a.id DESC";

fn row_to_article(row: &Row<'_>) -> rusqlite::Result<ArticleRow> {
    Ok(ArticleRow {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        body: row.get(4)?,
        author_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn row_to_view(row: &Row<'_>) -> rusqlite::Result<ArticleView> {
    Ok(ArticleView {
        article: row_to_article(row)?,
        author: ProfileView {
            username: row.get(8)?,
            bio: row.get(9)?,
            image: row.get(10)?,
            following: row.get(11)?,
        },
        tags: Vec::new(),
        favorited: row.get(12)?,
        favorites_count: row.get(13)?,
    })
}

/// Insert an article. Returns the new row id. A slug collision surfaces as
/// `StorageError::ConstraintViolation`.
pub fn insert_article(
    conn: &Connection,
    article: &NewArticle<'_>,
    now: i64,
) -> Result<i64, StorageError> {
    let slug = slugify(article.title);
    conn.prepare_cached(
        "INSERT INTO articles (slug, title, description, body, author_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            slug,
            article.title,
            article.description,
            article.body,
            article.author_id,
            now
        ])
    })
    .map_err(map_sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_article_by_slug(conn: &Connection, slug: &str) -> Result<Option<ArticleRow>, StorageError> {
    conn.prepare_cached(
        "SELECT id, slug, title, description, body, author_id, created_at, updated_at
         FROM articles WHERE slug = ?1",
    )
    .and_then(|mut stmt| stmt.query_row(params![slug], row_to_article).optional())
    .map_err(map_sqlite_err)
}

/// Apply a partial update. Returns the article's slug after the update,
/// or `None` if no article has this id.
pub fn update_article(
    conn: &Connection,
    id: i64,
    changes: &ArticleChanges,
    now: i64,
) -> Result<Option<String>, StorageError> {
    let slug = changes.title.as_deref().map(slugify);
    let updated = conn
        .prepare_cached(
            "UPDATE articles SET
                title = COALESCE(?1, title),
                slug = COALESCE(?2, slug),
                description = COALESCE(?3, description),
                body = COALESCE(?4, body),
                updated_at = ?5
             WHERE id = ?6",
        )
        .and_then(|mut stmt| {
            stmt.execute(params![
                changes.title,
                slug,
                changes.description,
                changes.body,
                now,
                id
            ])
        })
        .map_err(map_sqlite_err)?;
    if updated == 0 {
        return Ok(None);
    }

    conn.prepare_cached("SELECT slug FROM articles WHERE id = ?1")
        .and_then(|mut stmt| stmt.query_row(params![id], |row| row.get(0)).optional())
        .map_err(map_sqlite_err)
}

/// Delete an article; comments, favorites and tag links cascade.
/// Returns whether a row was removed.
pub fn delete_article(conn: &Connection, id: i64) -> Result<bool, StorageError> {
    let removed = conn
        .prepare_cached("DELETE FROM articles WHERE id = ?1")
        .and_then(|mut stmt| stmt.execute(params![id]))
        .map_err(map_sqlite_err)?;
    Ok(removed > 0)
}

/// The full view of one article relative to `viewer`.
pub fn view_article_by_slug(
    conn: &Connection,
    slug: &str,
    viewer: Option<i64>,
) -> Result<Option<ArticleView>, StorageError> {
    let sql = format!("{VIEW_SELECT} WHERE a.slug = ?2");
    let view = conn
        .prepare_cached(&sql)
        .and_then(|mut stmt| stmt.query_row(params![viewer, slug], row_to_view).optional())
        .map_err(map_sqlite_err)?;

    match view {
        Some(mut view) => {
            view.tags = super::tags::tags_for_article(conn, view.article.id)?;
            Ok(Some(view))
        }
        None => Ok(None),
    }
}

/// Build the AND-ed WHERE clause for `filter`, numbering placeholders from
/// `first_param`.
fn filter_clause(filter: &ArticleFilter, first_param: usize) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(tag) = &filter.tag {
        clauses.push(format!(
            "a.id IN (SELECT at.article_id FROM article_tags at
                      JOIN tags t ON t.id = at.tag_id WHERE t.tag = ?{})",
            first_param + values.len()
        ));
        values.push(Value::Text(tag.clone()));
    }
    if let Some(author) = &filter.author {
        clauses.push(format!("u.username = ?{}", first_param + values.len()));
        values.push(Value::Text(author.clone()));
    }
    if let Some(favorited) = &filter.favorited {
        clauses.push(format!(
            "a.id IN (SELECT fv.article_id FROM favorites fv
                      JOIN users fu ON fu.id = fv.user_id WHERE fu.username = ?{})",
            first_param + values.len()
        ));
        values.push(Value::Text(favorited.clone()));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), values)
    }
}

fn viewer_value(viewer: Option<i64>) -> Value {
    viewer.map_or(Value::Null, Value::Integer)
}

/// Run a view query and attach tags to each article in one extra statement.
fn load_views(
    conn: &Connection,
    sql: &str,
    values: Vec<Value>,
) -> Result<Vec<ArticleView>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(map_sqlite_err)?;
    let rows = stmt
        .query_map(params_from_iter(values), row_to_view)
        .map_err(map_sqlite_err)?;
    let mut views = rows.collect::<Result<Vec<_>, _>>().map_err(map_sqlite_err)?;

    let ids: Vec<i64> = views.iter().map(|v| v.article.id).collect();
    let mut tags = tags_for_articles(conn, &ids)?;
    for view in &mut views {
        view.tags = tags.remove(&view.article.id).unwrap_or_default();
    }
    Ok(views)
}

fn count(conn: &Connection, sql: &str, values: Vec<Value>) -> Result<u64, StorageError> {
    let total: i64 = conn
        .prepare_cached(sql)
        .and_then(|mut stmt| stmt.query_row(params_from_iter(values), |row| row.get(0)))
        .map_err(map_sqlite_err)?;
    Ok(total.max(0) as u64)
}

/// Filtered, paginated article listing, newest first.
///
/// `total` counts every match ignoring the page window. A filter naming an
/// unknown tag or user simply matches nothing.
pub fn find_many(
    conn: &Connection,
    filter: &ArticleFilter,
    page: PageRequest,
    viewer: Option<i64>,
) -> Result<PaginatedResult<ArticleView>, StorageError> {
    let (count_where, count_values) = filter_clause(filter, 1);
    let total = count(
        conn,
        &format!(
            "SELECT COUNT(*) FROM articles a JOIN users u ON u.id = a.author_id {count_where}"
        ),
        count_values,
    )?;
    if total == 0 {
        return Ok(PaginatedResult::empty());
    }

    let (view_where, filter_values) = filter_clause(filter, 2);
    let limit_param = 2 + filter_values.len();
    let sql = format!(
        "{VIEW_SELECT} {view_where} {ORDER_BY} LIMIT ?{} OFFSET ?{}",
        limit_param,
        limit_param + 1
    );

    let mut values = Vec::with_capacity(filter_values.len() + 3);
    values.push(viewer_value(viewer));
    values.extend(filter_values);
    values.push(Value::Integer(page.limit));
    values.push(Value::Integer(page.offset));

    let items = load_views(conn, &sql, values)?;
    Ok(PaginatedResult { items, total })
}

/// Articles written by users `viewer` follows, newest first.
pub fn feed(
    conn: &Connection,
    viewer: i64,
    page: PageRequest,
) -> Result<PaginatedResult<ArticleView>, StorageError> {
    const FEED_WHERE: &str =
        "WHERE a.author_id IN (SELECT followee_id FROM follows WHERE follower_id = ?1)";

    let total = count(
        conn,
        &format!("SELECT COUNT(*) FROM articles a {FEED_WHERE}"),
        vec![Value::Integer(viewer)],
    )?;
    if total == 0 {
        return Ok(PaginatedResult::empty());
    }

    let sql = format!("{VIEW_SELECT} {FEED_WHERE} {ORDER_BY} LIMIT ?2 OFFSET ?3");
    let items = load_views(
        conn,
        &sql,
        vec![
            Value::Integer(viewer),
            Value::Integer(page.limit),
            Value::Integer(page.offset),
        ],
    )?;
    Ok(PaginatedResult { items, total })
}
