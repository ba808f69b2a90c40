use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use conduit_storage::queries::tags;

use crate::error::ApiError;
use crate::serializers::TagsEnvelope;
use crate::state::AppState;

/// GET /api/tags
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<TagsEnvelope>, ApiError> {
    let tags = state.read(|conn| Ok(tags::all_tags(conn)?)).await?;
    Ok(Json(TagsEnvelope { tags }))
}
