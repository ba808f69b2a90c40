//! Profiles and the follow graph.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use conduit_storage::queries::util::now_millis;
use conduit_storage::queries::{follows, users};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::params::ApiPath;
use crate::serializers::ProfileEnvelope;
use crate::state::AppState;

fn profile_body(profile: users::ProfileView) -> Json<ProfileEnvelope> {
    Json(ProfileEnvelope {
        profile: profile.into(),
    })
}

/// GET /api/profiles/{username}
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    let viewer = auth.id();
    let profile = state
        .read(move |conn| Ok(users::get_profile(conn, &username, Some(viewer))?))
        .await?
        .ok_or_else(ApiError::profile_not_found)?;
    Ok(profile_body(profile))
}

/// POST /api/profiles/{username}/follow
pub async fn follow(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    set_following(&state, auth.id(), username, true).await
}

/// DELETE /api/profiles/{username}/follow
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    set_following(&state, auth.id(), username, false).await
}

async fn set_following(
    state: &AppState,
    viewer: i64,
    username: String,
    following: bool,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    let profile = state
        .write(move |conn| {
            let target =
                users::get_user_by_username(conn, &username)?.ok_or_else(ApiError::profile_not_found)?;
            if following {
                follows::follow(conn, viewer, target.id, now_millis())?;
            } else {
                follows::unfollow(conn, viewer, target.id)?;
            }
            users::get_profile(conn, &username, Some(viewer))?.ok_or_else(ApiError::profile_not_found)
        })
        .await?;
    Ok(profile_body(profile))
}
