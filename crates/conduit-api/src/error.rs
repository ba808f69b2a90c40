//! API error type and its mapping onto HTTP responses.
//!
//! Every error body has the shape `{"errors": {key: message}}`.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use conduit_core::errors::{AuthError, ConduitErrorCode, StorageError, ValidationError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body is not valid JSON for the expected payload. 400.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Query string or path segment could not be decoded. 400.
    #[error("invalid {key}: {message}")]
    InvalidParameter { key: &'static str, message: String },

    /// Field validation failed. 422.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Token or password problems; status depends on the variant.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Wrong email or password on login. 403.
    #[error("Not Registered email or invalid password")]
    LoginFailed,

    /// Authenticated, but not allowed to touch this resource. 403.
    #[error("{key}: {message}")]
    Forbidden {
        key: &'static str,
        message: &'static str,
    },

    /// 404.
    #[error("{key}: {message}")]
    NotFound {
        key: &'static str,
        message: &'static str,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn article_not_found() -> Self {
        Self::NotFound {
            key: "articles",
            message: "Invalid slug",
        }
    }

    pub fn profile_not_found() -> Self {
        Self::NotFound {
            key: "profile",
            message: "Invalid username",
        }
    }

    pub fn comment_not_found() -> Self {
        Self::NotFound {
            key: "comment",
            message: "Invalid id",
        }
    }

    pub fn not_author(key: &'static str) -> Self {
        Self::Forbidden {
            key,
            message: "Only the author can modify this resource",
        }
    }

    /// A single-field validation failure.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut err = ValidationError::new();
        err.add(field, message);
        Self::Validation(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) | Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Auth(AuthError::MissingToken | AuthError::InvalidToken { .. }) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::EmptyPassword) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::LoginFailed | Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage(e) if e.is_constraint_violation() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_fields(&self) -> BTreeMap<String, String> {
        let single = |key: &str, message: String| BTreeMap::from([(key.to_string(), message)]);
        match self {
            Self::MalformedPayload(message) => single("body", message.clone()),
            Self::InvalidParameter { key, message } => single(*key, message.clone()),
            Self::Validation(err) => err.fields().clone(),
            Self::Auth(AuthError::EmptyPassword) => single("password", self.to_string()),
            Self::Auth(e) if e.is_client_error() => single("token", e.to_string()),
            Self::LoginFailed => single("login", self.to_string()),
            Self::Forbidden { key, message } | Self::NotFound { key, message } => {
                single(*key, message.to_string())
            }
            Self::Storage(e) if e.is_constraint_violation() => single("database", e.to_string()),
            Self::Auth(_) | Self::Storage(_) | Self::Internal(_) => {
                single("server", "internal error".to_string())
            }
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                Self::Storage(e) => tracing::warn!(code = e.error_code(), error = %e, "storage failure"),
                Self::Auth(e) => tracing::warn!(code = e.error_code(), error = %e, "auth failure"),
                other => tracing::warn!(error = %other, "request failed"),
            }
        }

        (status, Json(json!({ "errors": self.error_fields() }))).into_response()
    }
}
