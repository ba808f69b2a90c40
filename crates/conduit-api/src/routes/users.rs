//! Registration, login and the current user.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use conduit_core::errors::AuthError;
use conduit_storage::queries::users::{self, NewUser, UserChanges, UserRow};
use conduit_storage::queries::util::now_millis;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::payloads::{parse_json, LoginPayload, RegisterPayload, UpdateUserPayload};
use crate::serializers::{UserEnvelope, UserResponse};
use crate::state::AppState;

fn user_body(state: &AppState, user: UserRow) -> Result<Json<UserEnvelope>, ApiError> {
    let token = state.tokens().issue(user.id)?;
    Ok(Json(UserEnvelope {
        user: UserResponse::new(user, token),
    }))
}

/// POST /api/users
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let payload: RegisterPayload = parse_json(&body)?;
    let input = payload.user;
    input.validate()?;

    let password_hash = state.hash_password(input.password.clone()).await?;
    let user = state
        .write(move |conn| {
            let id = users::insert_user(
                conn,
                &NewUser {
                    username: &input.username,
                    email: &input.email,
                    password_hash: &password_hash,
                    bio: &input.bio,
                    image: input.image.as_deref(),
                },
                now_millis(),
            )?;
            users::get_user_by_id(conn, id)?
                .ok_or_else(|| ApiError::Internal("inserted user vanished".to_string()))
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, user_body(&state, user)?))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UserEnvelope>, ApiError> {
    let payload: LoginPayload = parse_json(&body)?;
    let input = payload.user;
    input.validate()?;

    let email = input.email.clone();
    let user = state
        .read(move |conn| Ok(users::get_user_by_email(conn, &email)?))
        .await?
        .ok_or(ApiError::LoginFailed)?;

    if !state
        .verify_password(input.password, user.password_hash.clone())
        .await?
    {
        tracing::debug!(user_id = user.id, "login rejected");
        return Err(ApiError::LoginFailed);
    }

    user_body(&state, user)
}

/// GET /api/user
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserEnvelope>, ApiError> {
    user_body(&state, auth.user)
}

/// PUT /api/user
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    body: Bytes,
) -> Result<Json<UserEnvelope>, ApiError> {
    let payload: UpdateUserPayload = parse_json(&body)?;
    let input = payload.user;
    input.validate()?;

    let password_hash = match input.password {
        Some(password) => Some(state.hash_password(password).await?),
        None => None,
    };
    let changes = UserChanges {
        username: input.username,
        email: input.email,
        bio: input.bio,
        image: input.image,
        password_hash,
    };

    let user_id = auth.id();
    let user = state
        .write(move |conn| {
            if !changes.is_empty() {
                users::update_user(conn, user_id, &changes, now_millis())?;
            }
            users::get_user_by_id(conn, user_id)?.ok_or_else(|| {
                ApiError::Auth(AuthError::InvalidToken {
                    reason: "user no longer exists".to_string(),
                })
            })
        })
        .await?;

    user_body(&state, user)
}
