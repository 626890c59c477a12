//! # CSV Transfer Handlers
//!
//! Bulk export and import of the catalog.
//!
//! ```text
//! GET  /api/export           ──► productos_2024-03-05.csv   (422 when catalog empty)
//! GET  /api/export/template  ──► one example row to fill in
//! POST /api/import  (text)   ──► parse_csv ──► Catalog::import_products ──► ImportReport
//! ```
//!
//! Dates inside exported files are rendered in the server's local time zone.
//! The download's file name carries the UTC date.

use axum::extract::rejection::StringRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Local, Utc};
use stockroom_core::csv::{export_filename, export_products, parse_csv, template_csv};
use stockroom_core::{CoreError, ImportReport};
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

fn csv_download(filename: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// `GET /api/export` - every product as a CSV download.
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let products = state.catalog().list_products().await?;
    if products.is_empty() {
        return Err(CoreError::NothingToExport.into());
    }

    info!(count = products.len(), "Exporting products");
    let body = export_products(&products, &Local);
    Ok(csv_download(export_filename(Utc::now().date_naive()), body))
}

/// `GET /api/export/template` - an example file for imports.
pub async fn export_template() -> Response {
    let now = Utc::now();
    let body = template_csv(&Local, now);
    csv_download(export_filename(now.date_naive()), body)
}

/// `POST /api/import` - creates one product per usable row.
///
/// Rows are created in file order; a failing row does not stop the rest.
/// A body that is not UTF-8 is rejected before any row is read.
pub async fn import_csv(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> ApiResult<Json<ImportReport>> {
    let body = body?;
    let inputs = parse_csv(&body);
    if inputs.is_empty() {
        return Err(CoreError::EmptyImport.into());
    }

    info!(rows = inputs.len(), "Importing products from CSV");
    Ok(Json(state.catalog().import_products(&inputs).await))
}
