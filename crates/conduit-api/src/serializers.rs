//! Response bodies.

use chrono::{DateTime, Utc};
use conduit_storage::queries::articles::ArticleView;
use conduit_storage::queries::comments::CommentView;
use conduit_storage::queries::users::{ProfileView, UserRow};
use serde::Serialize;

/// RFC 3339 UTC with millisecond precision, e.g. `2024-01-02T03:04:05.678Z`.
pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
}

impl UserResponse {
    pub fn new(user: UserRow, token: String) -> Self {
        Self {
            email: user.email,
            token,
            username: user.username,
            bio: user.bio,
            image: user.image,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
    pub following: bool,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        Self {
            username: view.username,
            bio: view.bio,
            image: view.image,
            following: view.following,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub favorited: bool,
    pub favorites_count: i64,
    pub author: ProfileResponse,
}

impl From<ArticleView> for ArticleResponse {
    fn from(view: ArticleView) -> Self {
        let article = view.article;
        Self {
            slug: article.slug,
            title: article.title,
            description: article.description,
            body: article.body,
            tag_list: view.tags,
            created_at: format_timestamp(article.created_at),
            updated_at: format_timestamp(article.updated_at),
            favorited: view.favorited,
            favorites_count: view.favorites_count,
            author: view.author.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
    pub author: ProfileResponse,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id,
            body: view.comment.body,
            created_at: format_timestamp(view.comment.created_at),
            updated_at: format_timestamp(view.comment.updated_at),
            author: view.author.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct ProfileEnvelope {
    pub profile: ProfileResponse,
}

#[derive(Debug, Serialize)]
pub struct ArticleEnvelope {
    pub article: ArticleResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesEnvelope {
    pub articles: Vec<ArticleResponse>,
    pub articles_count: u64,
}

#[derive(Debug, Serialize)]
pub struct CommentEnvelope {
    pub comment: CommentResponse,
}

#[derive(Debug, Serialize)]
pub struct CommentsEnvelope {
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Serialize)]
pub struct TagsEnvelope {
    pub tags: Vec<String>,
}
