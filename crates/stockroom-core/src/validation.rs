//! # Validation Module
//!
//! Form-level validation for product payloads and table queries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── Basic format checks (empty fields)                                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules + EAN-13 check digits                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── NOT NULL constraints only; barcodes are stored as given           │
//! │                                                                         │
//! │  CSV import skips layer 2 on purpose: rows are written as parsed.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::validate_product_input;
//! use stockroom_core::ProductInput;
//!
//! let input = ProductInput::new(" PROD-001 ", "Milk 1L", "4006381333931");
//! let clean = validate_product_input(&input).unwrap();
//! assert_eq!(clean.code, "PROD-001");
//! ```

use crate::ean::{explain_ean_error, normalize_ean};
use crate::error::ValidationError;
use crate::types::ProductInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted search term, in characters. Codes and descriptions
/// have no upper bound.
pub const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty (after trimming)
pub fn validate_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }
    Ok(())
}

/// Validates a table search term. Length is counted in characters.
pub fn validate_search_query(query: &str) -> ValidationResult<()> {
    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Barcode Validators
// =============================================================================

/// Validates a required EAN-13 field.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_ean;
///
/// assert!(validate_ean("eanPrimary", "4006381333931").is_ok());
/// assert!(validate_ean("eanPrimary", "").is_err());
/// ```
pub fn validate_ean(field: &str, ean: &str) -> ValidationResult<()> {
    match explain_ean_error(ean) {
        None => Ok(()),
        Some(reason) => Err(ValidationError::InvalidEan {
            field: field.to_string(),
            reason,
        }),
    }
}

/// Validates an EAN-13 field that may be left blank.
pub fn validate_optional_ean(field: &str, ean: &str) -> ValidationResult<()> {
    if ean.trim().is_empty() {
        return Ok(());
    }
    validate_ean(field, ean)
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a create/update payload and returns it cleaned up.
///
/// Text fields come back trimmed and barcodes with all whitespace removed,
/// so the store only ever sees canonical 13-digit strings from forms.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<ProductInput> {
    validate_code(&input.code)?;
    validate_ean("eanPrimary", &input.ean_primary)?;
    validate_optional_ean("eanSecondary", &input.ean_secondary)?;

    Ok(ProductInput {
        code: input.code.trim().to_string(),
        description: input.description.trim().to_string(),
        ean_primary: normalize_ean(&input.ean_primary),
        ean_secondary: normalize_ean(&input.ean_secondary),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ean::EanError;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("PROD-001").is_ok());
        assert!(matches!(
            validate_code("   "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_long_text_fields_are_accepted() {
        let input = ProductInput::new("A".repeat(500), "ñ".repeat(5_000), "4006381333931");
        let clean = validate_product_input(&input).unwrap();
        assert_eq!(clean.code.len(), 500);
        assert_eq!(clean.description.chars().count(), 5_000);
    }

    #[test]
    fn test_validate_search_query() {
        assert!(validate_search_query("").is_ok());
        assert!(validate_search_query(&"x".repeat(100)).is_ok());
        assert!(validate_search_query(&"x".repeat(101)).is_err());
        assert!(validate_search_query(&"ñ".repeat(100)).is_ok());
    }

    #[test]
    fn test_primary_ean_is_required() {
        let input = ProductInput::new("A", "B", "");
        let err = validate_product_input(&input).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidEan {
                reason: EanError::Empty,
                ..
            }
        ));
        assert_eq!(err.field(), "eanPrimary");
    }

    #[test]
    fn test_secondary_ean_checked_only_when_present() {
        let ok = ProductInput::new("A", "B", "4006381333931").with_secondary("  ");
        assert!(validate_product_input(&ok).is_ok());

        let bad = ProductInput::new("A", "B", "4006381333931").with_secondary("4006381333930");
        let err = validate_product_input(&bad).unwrap_err();
        assert_eq!(err.field(), "eanSecondary");
        assert_eq!(err.to_string(), "eanSecondary: Invalid EAN (incorrect checksum)");
    }

    #[test]
    fn test_payload_is_cleaned() {
        let input = ProductInput::new(" A-1 ", " Milk ", "400 6381 333931").with_secondary(" ");
        let clean = validate_product_input(&input).unwrap();
        assert_eq!(clean, ProductInput::new("A-1", "Milk", "4006381333931"));
    }
}
