//! # Activity Handlers

use axum::extract::State;
use axum::Json;
use stockroom_core::ActivityEntry;

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/activity` - newest entries first, at most 100.
pub async fn list_activity(State(state): State<AppState>) -> ApiResult<Json<Vec<ActivityEntry>>> {
    Ok(Json(state.catalog().list_activity().await?))
}
