//! # Product Table View
//!
//! The filter → sort → paginate pipeline behind the product table.
//!
//! ## Pipeline
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ all products │──►│    filter    │──►│     sort     │──►│   paginate   │
//! │  (from store)│   │ search term  │   │ field + dir  │   │ page / size  │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                 │
//!                                                          ┌──────▼───────┐
//!                                                          │  TableView   │
//!                                                          └──────────────┘
//! ```
//!
//! Everything runs in memory over the full product list; nothing is pushed
//! down to the store.
//!
//! ## State Transitions
//! | Action                 | Effect                                          |
//! |------------------------|-------------------------------------------------|
//! | `set_search`           | new term, back to page 1                        |
//! | `toggle_sort` (same)   | flip direction                                  |
//! | `toggle_sort` (other)  | new field, ascending                            |
//! | `set_page_size`        | new size, back to page 1                        |
//! | `set_page`             | requested page, clamped when the view is built  |

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Product;
use crate::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

// =============================================================================
// Sort Field & Direction
// =============================================================================

/// Column the table is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum SortField {
    Code,
    Description,
    EanPrimary,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Code,
        SortField::Description,
        SortField::EanPrimary,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::Code => "code",
            SortField::Description => "description",
            SortField::EanPrimary => "eanPrimary",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Compares two products on this field, ascending.
    ///
    /// Text columns compare case-insensitively, timestamps chronologically.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Code => cmp_folded(&a.code, &b.code),
            SortField::Description => cmp_folded(&a.description, &b.description),
            SortField::EanPrimary => cmp_folded(&a.ean_primary, &b.ean_primary),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: SortField::ALL.iter().map(|f| f.as_str().to_string()).collect(),
            })
    }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Orients an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ValidationError::NotAllowed {
                field: "direction".to_string(),
                allowed: vec!["asc".to_string(), "desc".to_string()],
            }),
        }
    }
}

// =============================================================================
// Page Size
// =============================================================================

/// Rows per page, restricted to [`PAGE_SIZES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    #[inline]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if PAGE_SIZES.contains(&value) {
            Ok(PageSize(value))
        } else {
            Err(ValidationError::NotAllowed {
                field: "pageSize".to_string(),
                allowed: PAGE_SIZES.iter().map(|s| s.to_string()).collect(),
            })
        }
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

// =============================================================================
// Pipeline Stages
// =============================================================================

/// Keeps the products matching `term`.
///
/// Code and description match case-insensitively; barcodes match as typed.
/// An empty term matches everything.
pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let folded = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.code.to_lowercase().contains(&folded)
                || p.description.to_lowercase().contains(&folded)
                || p.ean_primary.contains(term)
                || p.ean_secondary.contains(term)
        })
        .collect()
}

/// Stable sort: products that compare equal keep their relative order in
/// both directions.
pub fn sort_products(products: &mut [&Product], field: SortField, direction: SortDirection) {
    products.sort_by(|a, b| direction.apply(field.compare(a, b)));
}

/// Number of pages needed for `len` rows, never less than one.
pub fn page_count(len: usize, size: PageSize) -> usize {
    len.div_ceil(size.get()).max(1)
}

/// Clamps a requested page number into `[1, page_count]`.
pub fn clamp_page(page: usize, len: usize, size: PageSize) -> usize {
    page.clamp(1, page_count(len, size))
}

// =============================================================================
// Table State
// =============================================================================

/// Everything the user has chosen on the product table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TableState {
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page: usize,
    #[ts(type = "number")]
    pub page_size: PageSize,
}

impl Default for TableState {
    /// Newest products first, first page, default page size.
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_field: SortField::CreatedAt,
            sort_direction: SortDirection::Desc,
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Same field flips the direction; a new field starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Runs the pipeline over `products`.
    pub fn view(&self, products: &[Product]) -> TableView {
        let mut rows = filter_products(products, &self.search);
        sort_products(&mut rows, self.sort_field, self.sort_direction);

        let filtered_count = rows.len();
        let size = self.page_size.get();
        let page = clamp_page(self.page, filtered_count, self.page_size);
        let items = rows
            .into_iter()
            .skip((page - 1) * size)
            .take(size)
            .cloned()
            .collect();

        TableView {
            items,
            page,
            page_size: self.page_size,
            total_pages: page_count(filtered_count, self.page_size),
            filtered_count,
            total_count: products.len(),
        }
    }
}

// =============================================================================
// Table View
// =============================================================================

/// One rendered page of the product table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TableView {
    /// Products on the current page.
    pub items: Vec<Product>,
    /// Current page after clamping (1-based).
    pub page: usize,
    #[ts(type = "number")]
    pub page_size: PageSize,
    pub total_pages: usize,
    /// Products matching the search term.
    pub filtered_count: usize,
    /// Products in the catalog.
    pub total_count: usize,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn catalog(n: usize) -> Vec<Product> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| Product {
                id: format!("id-{i}"),
                code: format!("P-{i:03}"),
                description: format!("Item {i}"),
                ean_primary: format!("{:013}", i),
                ean_secondary: String::new(),
                created_at: base + Duration::minutes(i as i64),
                updated_at: base + Duration::minutes(i as i64),
            })
            .collect()
    }

    fn codes(view: &TableView) -> Vec<&str> {
        view.items.iter().map(|p| p.code.as_str()).collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let state = TableState::default();
        let view = state.view(&catalog(3));
        assert_eq!(codes(&view), vec!["P-002", "P-001", "P-000"]);
        assert_eq!(view.page, 1);
        assert_eq!(view.page_size.get(), 10);
    }

    #[test]
    fn test_filter_text_is_case_insensitive() {
        let mut products = catalog(3);
        products[1].description = "Blue WIDGET".to_string();

        let hits = filter_products(&products, "widget");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "P-001");

        assert_eq!(filter_products(&products, "p-00").len(), 3);
        assert_eq!(filter_products(&products, "").len(), 3);
    }

    #[test]
    fn test_filter_matches_both_barcodes() {
        let mut products = catalog(3);
        products[2].ean_secondary = "5901234123457".to_string();

        let hits = filter_products(&products, "590123");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "P-002");
    }

    #[test]
    fn test_toggle_sort_transitions() {
        let mut state = TableState::new();
        state.toggle_sort(SortField::Code);
        assert_eq!(state.sort_field, SortField::Code);
        assert_eq!(state.sort_direction, SortDirection::Asc);

        state.toggle_sort(SortField::Code);
        assert_eq!(state.sort_direction, SortDirection::Desc);

        state.toggle_sort(SortField::Description);
        assert_eq!(state.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_text_ignores_case() {
        let mut products = catalog(3);
        products[0].code = "banana".to_string();
        products[1].code = "Apple".to_string();
        products[2].code = "cherry".to_string();

        let mut state = TableState::new();
        state.toggle_sort(SortField::Code);
        assert_eq!(codes(&state.view(&products)), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_is_stable_both_ways() {
        let mut products = catalog(4);
        for p in &mut products {
            p.description = "same".to_string();
        }

        let mut rows = filter_products(&products, "");
        sort_products(&mut rows, SortField::Description, SortDirection::Desc);
        let order: Vec<&str> = rows.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(order, vec!["P-000", "P-001", "P-002", "P-003"]);
    }

    #[test]
    fn test_search_and_page_size_reset_page() {
        let mut state = TableState::new();
        state.set_page(3);
        state.set_search("x");
        assert_eq!(state.page, 1);

        state.set_page(4);
        state.set_page_size(PageSize::try_from(20).unwrap());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_page_is_clamped() {
        let products = catalog(12);
        let mut state = TableState::new();

        state.set_page(99);
        let view = state.view(&products);
        assert_eq!(view.page, 2);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total_pages, 2);

        state.set_page(0);
        assert_eq!(state.view(&products).page, 1);

        state.previous_page();
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_empty_catalog_has_one_page() {
        let view = TableState::new().view(&[]);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 1);
        assert!(view.items.is_empty());
        assert_eq!(view.total_count, 0);
    }

    #[test]
    fn test_counts() {
        let products = catalog(25);
        let mut state = TableState::new();
        state.set_search("P-01");
        let view = state.view(&products);
        assert_eq!(view.filtered_count, 10);
        assert_eq!(view.total_count, 25);
    }

    #[test]
    fn test_parse_query_values() {
        assert_eq!("eanPrimary".parse::<SortField>().unwrap(), SortField::EanPrimary);
        assert!("price".parse::<SortField>().is_err());
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("DESC".parse::<SortDirection>().is_err());
        assert!(PageSize::try_from(7).is_err());
        assert_eq!(PageSize::try_from(50).unwrap().get(), 50);
    }

    #[test]
    fn test_page_size_deserializes_through_validation() {
        assert!(serde_json::from_str::<PageSize>("20").is_ok());
        assert!(serde_json::from_str::<PageSize>("3").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the pages cover every row, and the last page holds the remainder.
        #[test]
        fn pagination_covers_all_rows(n in 0usize..200, size_idx in 0usize..4) {
            let size = PageSize::try_from(PAGE_SIZES[size_idx]).unwrap();
            let products = catalog(n);
            let pages = page_count(n, size);
            prop_assert!(pages * size.get() >= n);

            let mut state = TableState::new();
            state.set_page_size(size);
            state.set_page(pages);
            let last = state.view(&products);

            let expected = if n == 0 {
                0
            } else if n % size.get() == 0 {
                size.get()
            } else {
                n % size.get()
            };
            prop_assert_eq!(last.items.len(), expected);
        }

        /// Property: filtering a filtered list changes nothing.
        #[test]
        fn filter_is_idempotent(n in 0usize..60, term in "[Pp0-9 -]{0,4}") {
            let products = catalog(n);
            let once: Vec<Product> = filter_products(&products, &term).into_iter().cloned().collect();
            let twice = filter_products(&once, &term);
            let once_ids: Vec<&str> = once.iter().map(|p| p.id.as_str()).collect();
            let twice_ids: Vec<&str> = twice.iter().map(|p| p.id.as_str()).collect();
            prop_assert_eq!(once_ids, twice_ids);
        }

        /// Property: toggling the same column twice restores the first ordering.
        #[test]
        fn double_toggle_restores_order(n in 0usize..40, field_idx in 0usize..5) {
            let products = catalog(n);
            let field = SortField::ALL[field_idx];

            let mut state = TableState::new();
            state.set_page_size(PageSize::try_from(50).unwrap());
            state.toggle_sort(field);
            let first = state.view(&products);
            state.toggle_sort(field);
            state.toggle_sort(field);
            prop_assert_eq!(first.items, state.view(&products).items);
        }
    }
}
