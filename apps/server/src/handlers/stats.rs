//! # Dashboard Statistics

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use stockroom_core::ProductStats;

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/stats` - counters as of now.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<ProductStats>> {
    Ok(Json(state.catalog().stats(Utc::now()).await?))
}
