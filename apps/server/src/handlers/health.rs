//! # Health Check

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: &'static str,
    pub backend: &'static str,
    pub version: &'static str,
}

/// `GET /health` - 200 when the store answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = state.catalog();
    let healthy = catalog.health_check().await;

    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        warn!(backend = catalog.store().backend_name(), "Store health check failed");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            backend: catalog.store().backend_name(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
