//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ActivityEntry  │   │  ProductStats   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  total          │       │
//! │  │  code (business)│   │  product_id     │   │  with_secondary │       │
//! │  │  description    │   │  action         │   │  recently_added │       │
//! │  │  ean_primary    │   │  changes        │   │  ...            │       │
//! │  │  ean_secondary  │   │  previous_values│   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductInput   │   │ ActivityAction  │   │ ProductChanges  │       │
//! │  │  (form payload) │   │  Created        │   │ (partial field  │       │
//! │  │                 │   │  Updated        │   │  set, all opt)  │       │
//! │  └─────────────────┘   │  Deleted        │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every product has:
//! - `id`: UUID v4 - immutable, assigned by the store
//! - `code`: human-readable business identifier, mutable, not unique
//!
//! ## Absent Secondary EAN
//! `ean_secondary` uses the empty string for "no secondary barcode". Stores
//! that have a native null (SQLite) map `""` to `NULL` on the way in and back
//! to `""` on the way out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// User-assigned short identifier.
    pub code: String,

    /// Free-text label.
    pub description: String,

    /// Main barcode (expected EAN-13, not enforced here).
    pub ean_primary: String,

    /// Optional second barcode; empty when absent.
    pub ean_secondary: String,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last written. Refreshed on every update.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks if a secondary barcode is set.
    #[inline]
    pub fn has_secondary_ean(&self) -> bool {
        !self.ean_secondary.is_empty()
    }

    /// Checks if the product was ever updated after creation.
    #[inline]
    pub fn was_modified(&self) -> bool {
        self.created_at != self.updated_at
    }

    /// Returns the editable fields as a form payload.
    pub fn to_input(&self) -> ProductInput {
        ProductInput {
            code: self.code.clone(),
            description: self.description.clone(),
            ean_primary: self.ean_primary.clone(),
            ean_secondary: self.ean_secondary.clone(),
        }
    }
}

// =============================================================================
// Product Input
// =============================================================================

/// The editable fields of a product, as submitted by a form or CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductInput {
    pub code: String,

    #[serde(default)]
    pub description: String,

    pub ean_primary: String,

    #[serde(default)]
    pub ean_secondary: String,
}

impl ProductInput {
    /// Creates an input with no secondary barcode.
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        ean_primary: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            ean_primary: ean_primary.into(),
            ean_secondary: String::new(),
        }
    }

    /// Sets the secondary barcode.
    pub fn with_secondary(mut self, ean: impl Into<String>) -> Self {
        self.ean_secondary = ean.into();
        self
    }
}

// =============================================================================
// Activity Action
// =============================================================================

/// The kind of mutation an activity entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
}

impl ActivityAction {
    /// Returns the wire/storage name of the action.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product Changes
// =============================================================================

/// A partial set of product fields.
///
/// Used for both "what was written" and "what it was before" in the
/// activity log. Missing fields are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean_primary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean_secondary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductChanges {
    /// Every field of `product`.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            code: Some(product.code.clone()),
            description: Some(product.description.clone()),
            ean_primary: Some(product.ean_primary.clone()),
            ean_secondary: Some(product.ean_secondary.clone()),
            created_at: Some(product.created_at),
            updated_at: Some(product.updated_at),
        }
    }

    /// The editable fields of `input`.
    pub fn from_input(input: &ProductInput) -> Self {
        Self {
            code: Some(input.code.clone()),
            description: Some(input.description.clone()),
            ean_primary: Some(input.ean_primary.clone()),
            ean_secondary: Some(input.ean_secondary.clone()),
            ..Self::default()
        }
    }
}

// =============================================================================
// Activity Entry
// =============================================================================

/// One append-only record in the activity log.
///
/// `product_id` is a plain association: the product may have been deleted
/// since, in which case the entry is all that is left of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ActivityEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The product this entry is about.
    pub product_id: String,

    pub action: ActivityAction,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// Fields written by the mutation (all fields for create/delete).
    pub changes: ProductChanges,

    /// Field values before an update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_values: Option<ProductChanges>,
}

// =============================================================================
// Product Stats
// =============================================================================

/// Dashboard summary counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductStats {
    /// Number of products in the catalog.
    pub total: u32,

    /// Products with a secondary barcode.
    pub with_secondary_ean: u32,

    /// `with_secondary_ean` as a rounded percentage of `total` (0 when empty).
    pub secondary_ean_percent: u32,

    /// Products created in the last 7 days.
    pub recently_added: u32,

    /// Products updated in the last 7 days, excluding never-edited ones.
    pub recently_updated: u32,

    /// Activity entries in the last 30 days.
    pub last_30_days_activity: u32,
}

// =============================================================================
// Import Report
// =============================================================================

/// Outcome of a bulk CSV import.
///
/// Rows are created one at a time with no surrounding transaction, so a
/// report with `failed > 0` describes a partially applied import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportReport {
    pub imported: u32,
    pub failed: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_product() -> Product {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        Product {
            id: "p-1".to_string(),
            code: "ABC-1".to_string(),
            description: "Widget".to_string(),
            ean_primary: "4006381333931".to_string(),
            ean_secondary: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert_eq!(json["eanPrimary"], "4006381333931");
        assert_eq!(json["eanSecondary"], "");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("ean_primary").is_none());
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            serde_json::to_string(&ActivityAction::Deleted).unwrap(),
            "\"deleted\""
        );
        let parsed: ActivityAction = serde_json::from_str("\"updated\"").unwrap();
        assert_eq!(parsed, ActivityAction::Updated);
        assert_eq!(ActivityAction::Created.to_string(), "created");
    }

    #[test]
    fn test_changes_omit_missing_fields() {
        let input = ProductInput::new("X", "Y", "4006381333931");
        let changes = ProductChanges::from_input(&input);
        let json = serde_json::to_value(&changes).unwrap();

        assert_eq!(json["code"], "X");
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_input_defaults_optional_fields() {
        let input: ProductInput =
            serde_json::from_str(r#"{"code":"A","eanPrimary":"4006381333931"}"#).unwrap();
        assert_eq!(input.description, "");
        assert_eq!(input.ean_secondary, "");
    }

    #[test]
    fn test_product_helpers() {
        let mut product = sample_product();
        assert!(!product.has_secondary_ean());
        assert!(!product.was_modified());

        product.ean_secondary = "1234567890128".to_string();
        product.updated_at = product.created_at + chrono::Duration::seconds(1);
        assert!(product.has_secondary_ean());
        assert!(product.was_modified());
        assert_eq!(product.to_input().ean_secondary, "1234567890128");
    }
}
