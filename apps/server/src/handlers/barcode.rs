//! # Manual Barcode Entry
//!
//! The typed-in fallback when no camera scanner is available. The code is
//! checked as EAN-13 and, when valid, looked up so the client can warn
//! about a barcode that is already taken.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use stockroom_core::scanner::accept_manual_entry;
use stockroom_core::Product;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ManualEntryRequest {
    pub ean: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryResponse {
    /// The accepted code, whitespace removed.
    pub ean: String,
    /// Product already using this code as its primary barcode.
    pub existing: Option<Product>,
}

/// `POST /api/barcode/manual`
pub async fn manual_entry(
    State(state): State<AppState>,
    payload: Result<Json<ManualEntryRequest>, JsonRejection>,
) -> ApiResult<Json<ManualEntryResponse>> {
    let Json(request) = payload?;
    let ean = accept_manual_entry(&request.ean)?;

    let existing = state.catalog().find_duplicate(&ean, None).await?;
    Ok(Json(ManualEntryResponse { ean, existing }))
}
