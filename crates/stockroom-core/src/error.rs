//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── EanError         - Barcode rejection reasons (ean.rs)             │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  ├── DbError          - Store operation failures                       │
//! │  └── CatalogError     - Façade failures (DbError + duplicate rule)     │
//! │                                                                         │
//! │  Server errors (in app)                                                │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: EanError → ValidationError → CoreError → ApiError → Frontend    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::ean::EanError;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// These stop an operation before anything is written to a store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The uploaded CSV yielded no usable rows.
    ///
    /// ## When This Occurs
    /// - Empty file, or a file with only the header line
    /// - Every data row is missing its code or primary EAN
    #[error("No valid products found in the CSV file")]
    EmptyImport,

    /// Export requested while the catalog is empty.
    #[error("There are no products to export")]
    NothingToExport,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before a store is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., unknown sort field).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Barcode rejected by the EAN-13 rules.
    #[error("{field}: {reason}")]
    InvalidEan { field: String, reason: EanError },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::InvalidEan { field, .. } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
