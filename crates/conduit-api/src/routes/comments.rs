//! Comments on articles.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use conduit_storage::queries::util::now_millis;
use conduit_storage::queries::{articles, comments};
use serde_json::{json, Value};

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::params::ApiPath;
use crate::payloads::{parse_json, CommentPayload};
use crate::serializers::{CommentEnvelope, CommentsEnvelope};
use crate::state::AppState;

/// GET /api/articles/{slug}/comments
pub async fn list(
    State(state): State<Arc<AppState>>,
    viewer: MaybeAuthUser,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<CommentsEnvelope>, ApiError> {
    let viewer = viewer.viewer_id();
    let list = state
        .read(move |conn| {
            let article =
                articles::get_article_by_slug(conn, &slug)?.ok_or_else(ApiError::article_not_found)?;
            Ok(comments::comments_for_article(conn, article.id, viewer)?)
        })
        .await?;
    Ok(Json(CommentsEnvelope {
        comments: list.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/articles/{slug}/comments
pub async fn create(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(slug): ApiPath<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<CommentEnvelope>), ApiError> {
    let payload: CommentPayload = parse_json(&body)?;
    let input = payload.comment;
    input.validate()?;

    let author_id = auth.id();
    let view = state
        .write(move |conn| {
            let article =
                articles::get_article_by_slug(conn, &slug)?.ok_or_else(ApiError::article_not_found)?;
            let id = comments::insert_comment(conn, article.id, author_id, &input.body, now_millis())?;
            comments::view_comment(conn, id, Some(author_id))?
                .ok_or_else(|| ApiError::Internal("inserted comment vanished".to_string()))
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentEnvelope {
            comment: view.into(),
        }),
    ))
}

/// DELETE /api/articles/{slug}/comments/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath((slug, id)): ApiPath<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let id: i64 = id.parse().map_err(|_| ApiError::comment_not_found())?;
    let user_id = auth.id();

    state
        .write(move |conn| {
            let article =
                articles::get_article_by_slug(conn, &slug)?.ok_or_else(ApiError::article_not_found)?;
            let comment = comments::get_comment(conn, id)?
                .filter(|c| c.article_id == article.id)
                .ok_or_else(ApiError::comment_not_found)?;
            if comment.author_id != user_id {
                return Err(ApiError::not_author("comment"));
            }
            comments::delete_comment(conn, comment.id)?;
            Ok(())
        })
        .await?;

    Ok(Json(json!({ "comment": "Delete success" })))
}
