//! # HTTP Handlers
//!
//! One module per resource. Handlers validate input, call the catalog, and
//! let [`ApiError`](crate::error::ApiError) shape every failure.
//!
//! ## Handler Modules
//! - [`products`] - CRUD, table view, duplicate lookup
//! - [`activity`] - Activity log
//! - [`stats`] - Dashboard counters
//! - [`transfer`] - CSV export, template, import
//! - [`barcode`] - Manual EAN entry
//! - [`health`] - Liveness and store health

pub mod activity;
pub mod barcode;
pub mod health;
pub mod products;
pub mod stats;
pub mod transfer;
