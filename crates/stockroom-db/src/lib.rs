//! # stockroom-db: Storage Layer for Stockroom
//!
//! This crate provides product persistence and the catalog façade.
//! SQLite (via sqlx) is the main backend; a single-file JSON key-value
//! store is the lightweight alternative.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /api/products)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Catalog     │───►│ ProductStore  │───►│ SqliteStore  │  │   │
//! │  │   │ (catalog.rs)  │    │  (store.rs)   │    │ LocalStore   │  │   │
//! │  │   │ activity log  │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  │                                                    │          │   │
//! │  │   ┌───────────────┐    ┌───────────────┐           │          │   │
//! │  │   │   Database    │◄───│ Repositories  │◄──────────┘          │   │
//! │  │   │   (pool.rs)   │    │ product.rs    │                      │   │
//! │  │   │  SqlitePool   │    │ activity.rs   │   001_initial.sql    │   │
//! │  │   └───────────────┘    └───────────────┘   (embedded)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stockroom.db (SQLite)   or   stockroom.json (key-value file)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite repositories (product, activity)
//! - [`store`] - The `ProductStore` trait and its SQLite implementation
//! - [`local`] - JSON key-value backend
//! - [`catalog`] - CRUD façade with activity logging
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Catalog, Database, DbConfig, SqliteStore};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//! let catalog = Catalog::new(SqliteStore::new(db));
//! let product = catalog.create_product(&input).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod local;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{Catalog, CatalogError, CatalogResult, DuplicatePolicy};
pub use error::{DbError, DbResult};
pub use local::LocalStore;
pub use pool::{Database, DbConfig};
pub use store::{AnyStore, ProductStore, SqliteStore};

// Repository re-exports for convenience
pub use repository::activity::ActivityRepository;
pub use repository::product::ProductRepository;
