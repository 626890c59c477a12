//! # Stockroom Server
//!
//! JSON API over the product catalog.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Server                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      axum Router                                │   │
//! │  │  /health  /api/products  /api/activity  /api/stats              │   │
//! │  │  /api/export  /api/import  /api/barcode/manual                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ State<AppState>                        │
//! │                                ▼                                        │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Catalog<AnyStore>   (stockroom-db)                             │   │
//! │  │  validation, CSV, table view, stats   (stockroom-core)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Routes
//! | Method | Path                       | Handler                        |
//! |--------|----------------------------|--------------------------------|
//! | GET    | `/health`                  | [`handlers::health::health`]   |
//! | GET    | `/api/products`            | list, newest first             |
//! | POST   | `/api/products`            | validated create (201)         |
//! | GET    | `/api/products/view`       | filtered, sorted page          |
//! | GET    | `/api/products/duplicate`  | barcode already in use?        |
//! | GET    | `/api/products/{id}`       | one product                    |
//! | PUT    | `/api/products/{id}`       | validated update               |
//! | DELETE | `/api/products/{id}`       | delete (204)                   |
//! | GET    | `/api/activity`            | activity log                   |
//! | GET    | `/api/stats`               | dashboard counters             |
//! | GET    | `/api/export`              | CSV download                   |
//! | GET    | `/api/export/template`     | CSV template                   |
//! | POST   | `/api/import`              | CSV import (text body)         |
//! | POST   | `/api/barcode/manual`      | manual EAN entry               |

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{activity, barcode, health, products, stats, transfer};

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/view", get(products::view_products))
        .route("/products/duplicate", get(products::find_duplicate))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/activity", get(activity::list_activity))
        .route("/stats", get(stats::get_stats))
        .route("/export", get(transfer::export_csv))
        .route("/export/template", get(transfer::export_template))
        .route("/import", post(transfer::import_csv))
        .route("/barcode/manual", post(barcode::manual_entry));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .with_state(state)
}
