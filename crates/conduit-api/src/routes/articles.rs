//! Articles: listing, feed, CRUD and favorites.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use conduit_core::slug::slugify;
use conduit_storage::pagination::PageRequest;
use conduit_storage::queries::articles::{
    self, ArticleChanges, ArticleFilter, ArticleView, NewArticle,
};
use conduit_storage::queries::util::now_millis;
use conduit_storage::queries::{favorites, tags};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::params::{ApiPath, ApiQuery};
use crate::payloads::{parse_json, CreateArticlePayload, UpdateArticlePayload};
use crate::serializers::{ArticleEnvelope, ArticlesEnvelope};
use crate::state::AppState;

/// Query string of the listing endpoints. Values stay strings so bad
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListParams {
    fn page(&self) -> PageRequest {
        PageRequest::parse(self.limit.as_deref(), self.offset.as_deref())
    }

    fn filter(&self) -> ArticleFilter {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        ArticleFilter {
            tag: non_empty(&self.tag),
            author: non_empty(&self.author),
            favorited: non_empty(&self.favorited),
        }
    }
}

fn article_body(view: ArticleView) -> Json<ArticleEnvelope> {
    Json(ArticleEnvelope {
        article: view.into(),
    })
}

fn articles_body(page: conduit_storage::PaginatedResult<ArticleView>) -> Json<ArticlesEnvelope> {
    Json(ArticlesEnvelope {
        articles: page.items.into_iter().map(Into::into).collect(),
        articles_count: page.total,
    })
}

/// Slug for a new title; titles made only of symbols have none.
fn slug_for(title: &str) -> Result<String, ApiError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(ApiError::invalid_field("Title", "{key: slug}"));
    }
    Ok(slug)
}

fn load_view(conn: &Connection, slug: &str, viewer: Option<i64>) -> Result<ArticleView, ApiError> {
    articles::view_article_by_slug(conn, slug, viewer)?.ok_or_else(ApiError::article_not_found)
}

/// Look up an article the caller is about to modify, enforcing authorship.
fn owned_article(
    conn: &Connection,
    slug: &str,
    user_id: i64,
) -> Result<articles::ArticleRow, ApiError> {
    let article = articles::get_article_by_slug(conn, slug)?.ok_or_else(ApiError::article_not_found)?;
    if article.author_id != user_id {
        return Err(ApiError::not_author("article"));
    }
    Ok(article)
}

/// GET /api/articles
pub async fn list(
    State(state): State<Arc<AppState>>,
    viewer: MaybeAuthUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ArticlesEnvelope>, ApiError> {
    let viewer = viewer.viewer_id();
    let filter = params.filter();
    let page = params.page();
    let result = state
        .read(move |conn| Ok(articles::find_many(conn, &filter, page, viewer)?))
        .await?;
    Ok(articles_body(result))
}

/// GET /api/articles/feed
pub async fn feed(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ArticlesEnvelope>, ApiError> {
    let viewer = auth.id();
    let page = params.page();
    let result = state
        .read(move |conn| Ok(articles::feed(conn, viewer, page)?))
        .await?;
    Ok(articles_body(result))
}

/// POST /api/articles
pub async fn create(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<ArticleEnvelope>), ApiError> {
    let payload: CreateArticlePayload = parse_json(&body)?;
    let input = payload.article;
    input.validate()?;
    let slug = slug_for(&input.title)?;

    let author_id = auth.id();
    let view = state
        .transaction(move |tx| {
            let id = articles::insert_article(
                tx,
                &NewArticle {
                    title: &input.title,
                    description: &input.description,
                    body: &input.body,
                    author_id,
                },
                now_millis(),
            )?;
            tags::set_article_tags(tx, id, &input.tag_list)?;
            load_view(tx, &slug, Some(author_id))
        })
        .await?;

    tracing::info!(slug = %view.article.slug, author_id, "article created");
    Ok((StatusCode::CREATED, article_body(view)))
}

/// GET /api/articles/{slug}
pub async fn get(
    State(state): State<Arc<AppState>>,
    viewer: MaybeAuthUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    let viewer = viewer.viewer_id();
    let view = state.read(move |conn| load_view(conn, &slug, viewer)).await?;
    Ok(article_body(view))
}

/// PUT /api/articles/{slug}
pub async fn update(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(slug): ApiPath<String>,
    body: Bytes,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    let payload: UpdateArticlePayload = parse_json(&body)?;
    let input = payload.article;
    input.validate()?;
    if let Some(title) = &input.title {
        slug_for(title)?;
    }

    let user_id = auth.id();
    let view = state
        .transaction(move |tx| {
            let article = owned_article(tx, &slug, user_id)?;
            let changes = ArticleChanges {
                title: input.title,
                description: input.description,
                body: input.body,
            };
            let new_slug = articles::update_article(tx, article.id, &changes, now_millis())?
                .ok_or_else(ApiError::article_not_found)?;
            if let Some(tag_list) = &input.tag_list {
                tags::set_article_tags(tx, article.id, tag_list)?;
            }
            load_view(tx, &new_slug, Some(user_id))
        })
        .await?;

    Ok(article_body(view))
}

/// DELETE /api/articles/{slug}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = auth.id();
    state
        .write(move |conn| {
            let article = owned_article(conn, &slug, user_id)?;
            articles::delete_article(conn, article.id)?;
            tracing::info!(slug = %article.slug, user_id, "article deleted");
            Ok(())
        })
        .await?;
    Ok(Json(json!({ "article": "Delete success" })))
}

/// POST /api/articles/{slug}/favorite
pub async fn favorite(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    set_favorite(&state, auth.id(), slug, true).await
}

/// DELETE /api/articles/{slug}/favorite
pub async fn unfavorite(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    set_favorite(&state, auth.id(), slug, false).await
}

async fn set_favorite(
    state: &AppState,
    user_id: i64,
    slug: String,
    favorited: bool,
) -> Result<Json<ArticleEnvelope>, ApiError> {
    let view = state
        .write(move |conn| {
            let article =
                articles::get_article_by_slug(conn, &slug)?.ok_or_else(ApiError::article_not_found)?;
            if favorited {
                favorites::favorite(conn, article.id, user_id, now_millis())?;
            } else {
                favorites::unfavorite(conn, article.id, user_id)?;
            }
            load_view(conn, &slug, Some(user_id))
        })
        .await?;
    Ok(article_body(view))
}
