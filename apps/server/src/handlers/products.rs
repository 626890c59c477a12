//! # Product Handlers
//!
//! CRUD over the catalog plus the table view used by the product list.
//!
//! ## Table View Query
//! ```text
//! GET /api/products/view?search=leche&sort=code&direction=desc&page=2&pageSize=20
//!       │
//!       ▼
//! TableState::default()        createdAt desc, page 1, 10 per page
//!   .set_search("leche")       page back to 1
//!   .toggle_sort(code)         new field, ascending
//!   .sort_direction = desc     explicit direction wins
//!   .set_page_size(20)
//!   .set_page(2)               clamped when the view is built
//!       │
//!       ▼
//! TableView { items, page, pageSize, totalPages, filteredCount, totalCount }
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stockroom_core::ean::normalize_ean;
use stockroom_core::table::{PageSize, SortDirection, SortField, TableState, TableView};
use stockroom_core::validation::{validate_product_input, validate_search_query};
use stockroom_core::{Product, ProductInput};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query string of `GET /api/products/view`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ViewParams {
    /// Replays the parameters onto a fresh table state.
    pub fn into_state(self) -> Result<TableState, ApiError> {
        let mut state = TableState::default();

        if let Some(search) = self.search {
            validate_search_query(&search)?;
            state.set_search(search);
        }
        if let Some(sort) = self.sort {
            state.toggle_sort(sort.parse::<SortField>()?);
        }
        if let Some(direction) = self.direction {
            state.sort_direction = direction.parse::<SortDirection>()?;
        }
        if let Some(size) = self.page_size {
            state.set_page_size(PageSize::try_from(size)?);
        }
        if let Some(page) = self.page {
            state.set_page(page);
        }

        Ok(state)
    }
}

/// Query string of `GET /api/products/duplicate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateParams {
    pub ean: String,
    #[serde(default)]
    pub exclude_id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products` - all products, newest first.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list_products().await?))
}

/// `GET /api/products/view` - one filtered, sorted page.
pub async fn view_products(
    State(state): State<AppState>,
    params: Result<Query<ViewParams>, QueryRejection>,
) -> ApiResult<Json<TableView>> {
    let Query(params) = params?;
    let table = params.into_state()?;
    debug!(
        search = %table.search,
        sort = table.sort_field.as_str(),
        page = table.page,
        "Building product table view"
    );

    let products = state.catalog().list_products().await?;
    Ok(Json(table.view(&products)))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.catalog().get_product(&id).await?))
}

/// `POST /api/products` - validated create, 201 on success.
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    let input = validate_product_input(&input)?;

    let product = state.catalog().create_product(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` - validated full update.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(input) = payload?;
    let input = validate_product_input(&input)?;

    Ok(Json(state.catalog().update_product(&id, &input).await?))
}

/// `DELETE /api/products/{id}` - 204 on success.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.catalog().delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/products/duplicate?ean=..&excludeId=..` - the product already
/// using `ean` as its primary barcode, or `null`.
pub async fn find_duplicate(
    State(state): State<AppState>,
    params: Result<Query<DuplicateParams>, QueryRejection>,
) -> ApiResult<Json<Option<Product>>> {
    let Query(params) = params?;
    let ean = normalize_ean(&params.ean);
    if ean.is_empty() {
        return Err(ApiError::validation("ean is required"));
    }

    let existing = state
        .catalog()
        .find_duplicate(&ean, params.exclude_id.as_deref())
        .await?;
    Ok(Json(existing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_give_default_state() {
        let state = ViewParams::default().into_state().unwrap();
        assert_eq!(state, TableState::default());
    }

    #[test]
    fn test_explicit_sort_starts_ascending() {
        let state = ViewParams {
            sort: Some("code".into()),
            ..Default::default()
        }
        .into_state()
        .unwrap();
        assert_eq!(state.sort_field, SortField::Code);
        assert_eq!(state.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_direction_overrides_toggle() {
        let state = ViewParams {
            sort: Some("description".into()),
            direction: Some("desc".into()),
            page: Some(3),
            page_size: Some(20),
            search: Some("leche ".into()),
        }
        .into_state()
        .unwrap();

        assert_eq!(state.sort_field, SortField::Description);
        assert_eq!(state.sort_direction, SortDirection::Desc);
        assert_eq!(state.page, 3);
        assert_eq!(state.page_size.get(), 20);
        // Kept verbatim: a trailing space narrows the match
        assert_eq!(state.search, "leche ");
    }

    #[test]
    fn test_bad_params_are_rejected() {
        let bad_size = ViewParams {
            page_size: Some(7),
            ..Default::default()
        };
        assert!(bad_size.into_state().is_err());

        let bad_sort = ViewParams {
            sort: Some("price".into()),
            ..Default::default()
        };
        assert!(bad_sort.into_state().is_err());

        let long_search = ViewParams {
            search: Some("x".repeat(500)),
            ..Default::default()
        };
        assert!(long_search.into_state().is_err());
    }
}
