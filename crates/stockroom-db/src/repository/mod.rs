//! # Repository Module
//!
//! SQLite repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Catalog façade                                                        │
//! │       │                                                                 │
//! │       │  store.insert_product(&input)                                  │
//! │       ▼                                                                 │
//! │  SqliteStore (ProductStore impl, store.rs)                             │
//! │       │                                                                 │
//! │       ├──► ProductRepository    list / get / insert / update / delete  │
//! │       └──► ActivityRepository   append / list                          │
//! │                 │                                                       │
//! │                 │  SQL Query                                            │
//! │                 ▼                                                       │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD and barcode lookup
//! - [`ActivityRepository`] - Activity log append and listing
//!
//! Timestamps cross the SQL boundary as epoch milliseconds; see
//! [`to_millis`] / [`from_millis`].

use chrono::{DateTime, Utc};

use crate::error::{DbError, DbResult};

pub mod activity;
pub mod product;

pub use activity::ActivityRepository;
pub use product::ProductRepository;

/// Converts a timestamp to its stored form.
pub fn to_millis(at: &DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Converts a stored timestamp back.
pub fn from_millis(millis: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DbError::Serialization(format!("timestamp out of range: {millis}")))
}
