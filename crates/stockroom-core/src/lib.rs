//! # stockroom-core: Pure Catalog Logic for Stockroom
//!
//! This crate holds everything about the product catalog that can be
//! expressed as a pure function: barcode validation, the CSV codec, the
//! table view pipeline and the dashboard statistics.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (any UI)                            │   │
//! │  │    Product Table ──► Product Form ──► Import/Export ──► Log     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockroom-server (axum)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockroom-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────────────┐  │   │
//! │  │   │   ean   │  │   csv   │  │  table  │  │ validation/stats │  │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Storage Layer)                    │   │
//! │  │           SQLite / key-value backends, Catalog façade           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ActivityEntry, ...)
//! - [`ean`] - EAN-13 check digit validation
//! - [`csv`] - Product CSV export/import
//! - [`table`] - Filter / sort / paginate pipeline
//! - [`validation`] - Form-level input validation
//! - [`stats`] - Dashboard statistics
//! - [`scanner`] - Manual barcode entry and capture sessions
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::ean::{explain_ean_error, is_valid_ean13, EanError};
//!
//! assert!(is_valid_ean13("4006381333931"));
//! assert_eq!(explain_ean_error("4006381333930"), Some(EanError::BadChecksum));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod csv;
pub mod ean;
pub mod error;
pub mod scanner;
pub mod stats;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of activity entries returned by a history listing.
///
/// Older entries stay in the store; they are simply not fetched.
pub const ACTIVITY_LIMIT: u32 = 100;

/// Page sizes the product table offers.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Page size used until the user picks another one.
pub const DEFAULT_PAGE_SIZE: usize = 10;
