//! Extractors resolving the calling user from the request.
//!
//! The token is read from `Authorization: Token <jwt>` (`Bearer` accepted,
//! scheme case-insensitive) and falls back to the `access_token` query
//! parameter.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use conduit_core::constants::TOKEN_SCHEME;
use conduit_core::errors::AuthError;
use conduit_storage::queries::users::{self, UserRow};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Required authentication. Rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserRow,
    pub token: String,
}

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// Optional authentication. Any token problem yields an anonymous viewer.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn viewer_id(&self) -> Option<i64> {
        self.0.as_ref().map(AuthUser::id)
    }
}

/// Query-string fallback for clients that cannot set headers.
#[derive(Debug, Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

/// Pull the raw token out of the request, if one was sent.
pub fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let mut pieces = value.split_whitespace();
        if let (Some(scheme), Some(token), None) = (pieces.next(), pieces.next(), pieces.next()) {
            if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) || scheme.eq_ignore_ascii_case("bearer") {
                return Some(token.to_string());
            }
        }
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.access_token)
        .filter(|token| !token.is_empty())
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, ApiError> {
    let token = token_from_parts(parts).ok_or(AuthError::MissingToken)?;
    let claims = state.tokens().verify(&token)?;

    let user = state
        .read(move |conn| Ok(users::get_user_by_id(conn, claims.id)?))
        .await?
        .ok_or_else(|| AuthError::InvalidToken {
            reason: "user no longer exists".to_string(),
        })?;

    Ok(AuthUser { user, token })
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await.inspect_err(|e| {
            tracing::debug!(path = %parts.uri.path(), error = %e, "authentication rejected");
        })
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if token_from_parts(parts).is_none() {
            return Ok(Self(None));
        }
        match authenticate(parts, state).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(e) => {
                tracing::debug!(path = %parts.uri.path(), error = %e, "ignoring invalid token");
                Ok(Self(None))
            }
        }
    }
}
