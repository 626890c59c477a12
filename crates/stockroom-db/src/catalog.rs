//! # Catalog Façade
//!
//! The CRUD entry point the server talks to. Wraps any [`ProductStore`] and
//! keeps the activity log in step with every mutation.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create / update / delete                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  duplicate-EAN check ── only with DuplicatePolicy::Reject               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store write ────────── failure → CatalogError::Db, nothing logged      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  append activity ────── failure → warn! and carry on (best effort)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  return the stored product                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Each Entry Records
//! | Action  | `changes`                | `previous_values`      |
//! |---------|--------------------------|------------------------|
//! | created | every field of the new product | -                |
//! | updated | the submitted fields     | every field before     |
//! | deleted | every field of the removed product | -            |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::stats::compute_stats;
use stockroom_core::{
    ActivityAction, ActivityEntry, ImportReport, Product, ProductChanges, ProductInput,
    ProductStats, ACTIVITY_LIMIT,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::store::{now, ProductStore};

// =============================================================================
// Errors
// =============================================================================

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The store request failed (or the product doesn't exist).
    #[error(transparent)]
    Db(#[from] DbError),

    /// Another product already uses this primary barcode.
    ///
    /// Only raised under [`DuplicatePolicy::Reject`].
    #[error("EAN {ean} is already used by product {existing_code}")]
    DuplicateEan {
        ean: String,
        existing_id: String,
        existing_code: String,
    },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Duplicate Policy
// =============================================================================

/// What to do when a primary barcode is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Store it anyway. Callers can still warn via [`Catalog::find_duplicate`].
    #[default]
    Allow,
    /// Refuse the write with [`CatalogError::DuplicateEan`].
    Reject,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(DuplicatePolicy::Allow),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!("unknown duplicate policy '{other}' (expected allow or reject)")),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// CRUD façade over a product store.
#[derive(Debug, Clone)]
pub struct Catalog<S> {
    store: S,
    policy: DuplicatePolicy,
}

impl<S: ProductStore> Catalog<S> {
    /// Creates a catalog that allows duplicate barcodes.
    pub fn new(store: S) -> Self {
        Catalog {
            store,
            policy: DuplicatePolicy::default(),
        }
    }

    /// Sets the duplicate-barcode policy.
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All products, newest-created first.
    pub async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.store.list_products().await?)
    }

    /// One product, or `NotFound`.
    pub async fn get_product(&self, id: &str) -> CatalogResult<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id).into())
    }

    /// Creates a product and logs a `created` entry.
    pub async fn create_product(&self, input: &ProductInput) -> CatalogResult<Product> {
        self.check_duplicate(&input.ean_primary, None).await?;

        let product = self.store.insert_product(input).await?;
        info!(id = %product.id, code = %product.code, "Product created");

        self.record(
            &product.id,
            ActivityAction::Created,
            ProductChanges::from_product(&product),
            None,
        )
        .await;

        Ok(product)
    }

    /// Overwrites a product and logs an `updated` entry with the prior values.
    pub async fn update_product(&self, id: &str, input: &ProductInput) -> CatalogResult<Product> {
        let previous = self.get_product(id).await?;
        self.check_duplicate(&input.ean_primary, Some(id)).await?;

        let product = self.store.update_product(id, input).await?;
        info!(id = %product.id, code = %product.code, "Product updated");

        self.record(
            &product.id,
            ActivityAction::Updated,
            ProductChanges::from_input(input),
            Some(ProductChanges::from_product(&previous)),
        )
        .await;

        Ok(product)
    }

    /// Hard-deletes a product and logs a `deleted` entry carrying its fields.
    pub async fn delete_product(&self, id: &str) -> CatalogResult<Product> {
        let product = self.store.delete_product(id).await?;
        info!(id = %product.id, code = %product.code, "Product deleted");

        self.record(
            &product.id,
            ActivityAction::Deleted,
            ProductChanges::from_product(&product),
            None,
        )
        .await;

        Ok(product)
    }

    /// The most recent activity entries (at most [`ACTIVITY_LIMIT`]).
    pub async fn list_activity(&self) -> CatalogResult<Vec<ActivityEntry>> {
        Ok(self.store.list_activity(ACTIVITY_LIMIT).await?)
    }

    /// Another product with primary barcode `ean`, if any.
    pub async fn find_duplicate(
        &self,
        ean: &str,
        exclude_id: Option<&str>,
    ) -> CatalogResult<Option<Product>> {
        Ok(self.store.find_by_ean(ean, exclude_id).await?)
    }

    /// Creates each payload in order.
    ///
    /// A failing row is logged and counted; the rest still go in. Rows
    /// already created stay created.
    pub async fn import_products(&self, inputs: &[ProductInput]) -> ImportReport {
        let mut report = ImportReport::default();

        for input in inputs {
            match self.create_product(input).await {
                Ok(_) => report.imported += 1,
                Err(err) => {
                    warn!(code = %input.code, error = %err, "Import row failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            imported = report.imported,
            failed = report.failed,
            "Import finished"
        );
        report
    }

    /// Dashboard counters as of `at`.
    pub async fn stats(&self, at: DateTime<Utc>) -> CatalogResult<ProductStats> {
        let products = self.store.list_products().await?;
        let history = self.store.list_activity(ACTIVITY_LIMIT).await?;
        Ok(compute_stats(&products, &history, at))
    }

    /// Checks if the store can serve requests.
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }

    async fn check_duplicate(&self, ean: &str, exclude_id: Option<&str>) -> CatalogResult<()> {
        if self.policy == DuplicatePolicy::Allow {
            return Ok(());
        }

        match self.store.find_by_ean(ean, exclude_id).await? {
            Some(existing) => {
                debug!(ean = %ean, existing_id = %existing.id, "Duplicate EAN rejected");
                Err(CatalogError::DuplicateEan {
                    ean: ean.to_string(),
                    existing_id: existing.id,
                    existing_code: existing.code,
                })
            }
            None => Ok(()),
        }
    }

    /// Appends one activity entry; failures are logged, never returned.
    async fn record(
        &self,
        product_id: &str,
        action: ActivityAction,
        changes: ProductChanges,
        previous_values: Option<ProductChanges>,
    ) {
        let entry = ActivityEntry {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            action,
            timestamp: now(),
            changes,
            previous_values,
        };

        if let Err(err) = self.store.append_activity(&entry).await {
            warn!(
                product_id = %product_id,
                action = %action,
                error = %err,
                "Failed to append activity entry"
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbResult;
    use crate::local::LocalStore;
    use crate::store::SqliteStore;
    use crate::{Database, DbConfig};

    async fn sqlite_catalog() -> Catalog<SqliteStore> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Catalog::new(SqliteStore::new(db))
    }

    fn milk() -> ProductInput {
        ProductInput::new("A-1", "Milk", "4006381333931")
    }

    /// Store whose activity log is always down.
    struct NoLogStore(LocalStore);

    impl ProductStore for NoLogStore {
        async fn list_products(&self) -> DbResult<Vec<Product>> {
            self.0.list_products().await
        }
        async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
            self.0.get_product(id).await
        }
        async fn insert_product(&self, input: &ProductInput) -> DbResult<Product> {
            self.0.insert_product(input).await
        }
        async fn update_product(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
            self.0.update_product(id, input).await
        }
        async fn delete_product(&self, id: &str) -> DbResult<Product> {
            self.0.delete_product(id).await
        }
        async fn find_by_ean(&self, ean: &str, exclude_id: Option<&str>) -> DbResult<Option<Product>> {
            self.0.find_by_ean(ean, exclude_id).await
        }
        async fn append_activity(&self, _entry: &ActivityEntry) -> DbResult<()> {
            Err(DbError::Storage("disk full".to_string()))
        }
        async fn list_activity(&self, limit: u32) -> DbResult<Vec<ActivityEntry>> {
            self.0.list_activity(limit).await
        }
        async fn health_check(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let catalog = sqlite_catalog().await;
        catalog
            .create_product(&ProductInput::new("OLD", "", "1234567890128"))
            .await
            .unwrap();
        let created = catalog.create_product(&milk()).await.unwrap();

        let products = catalog.list_products().await.unwrap();
        assert_eq!(products[0], created);

        let created_entries: Vec<ActivityEntry> = catalog
            .list_activity()
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.product_id == created.id)
            .collect();
        assert_eq!(created_entries.len(), 1);
        assert_eq!(created_entries[0].action, ActivityAction::Created);
        assert_eq!(
            created_entries[0].changes,
            ProductChanges::from_product(&created)
        );
    }

    #[tokio::test]
    async fn test_update_logs_previous_values() {
        let catalog = sqlite_catalog().await;
        let created = catalog.create_product(&milk()).await.unwrap();

        let input = ProductInput::new("A-1", "Milk 1L", "4006381333931");
        let updated = catalog.update_product(&created.id, &input).await.unwrap();
        assert_eq!(updated.description, "Milk 1L");

        let history = catalog.list_activity().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, ActivityAction::Updated);
        assert_eq!(history[0].changes, ProductChanges::from_input(&input));
        assert_eq!(
            history[0].previous_values.as_ref().and_then(|p| p.description.clone()),
            Some("Milk".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_missing_logs_nothing() {
        let catalog = sqlite_catalog().await;
        let err = catalog.update_product("ghost", &milk()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Db(ref e) if e.is_not_found()));
        assert!(catalog.list_activity().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_logs_removed_product() {
        let catalog = sqlite_catalog().await;
        let created = catalog.create_product(&milk()).await.unwrap();
        catalog.delete_product(&created.id).await.unwrap();

        assert!(catalog.list_products().await.unwrap().is_empty());
        let history = catalog.list_activity().await.unwrap();
        assert_eq!(history[0].action, ActivityAction::Deleted);
        assert_eq!(history[0].product_id, created.id);
        assert_eq!(history[0].changes.code.as_deref(), Some("A-1"));

        assert!(catalog.get_product(&created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicates_allowed_by_default() {
        let catalog = sqlite_catalog().await;
        let first = catalog.create_product(&milk()).await.unwrap();
        catalog.create_product(&milk()).await.unwrap();

        let dup = catalog.find_duplicate("4006381333931", None).await.unwrap();
        assert_eq!(dup.map(|p| p.id), Some(first.id));
    }

    #[tokio::test]
    async fn test_reject_policy() {
        let catalog = sqlite_catalog().await.with_policy(DuplicatePolicy::Reject);
        let first = catalog.create_product(&milk()).await.unwrap();

        let err = catalog.create_product(&milk()).await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEan { .. }));

        // Re-saving a product with its own barcode is fine
        catalog.update_product(&first.id, &milk()).await.unwrap();
        assert_eq!(catalog.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_activity_failure_does_not_fail_mutation() {
        let catalog = Catalog::new(NoLogStore(LocalStore::in_memory()));
        let created = catalog.create_product(&milk()).await.unwrap();
        catalog.update_product(&created.id, &milk()).await.unwrap();
        catalog.delete_product(&created.id).await.unwrap();
        assert!(catalog.list_activity().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_counts_failures() {
        let catalog = Catalog::new(LocalStore::in_memory()).with_policy(DuplicatePolicy::Reject);
        let rows = vec![
            milk(),
            ProductInput::new("B-2", "Bread", "1234567890128"),
            ProductInput::new("A-2", "Milk again", "4006381333931"),
        ];

        let report = catalog.import_products(&rows).await;
        assert_eq!(report, ImportReport { imported: 2, failed: 1 });
        assert_eq!(catalog.list_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stats() {
        let catalog = sqlite_catalog().await;
        catalog
            .create_product(&milk().with_secondary("1234567890128"))
            .await
            .unwrap();
        catalog
            .create_product(&ProductInput::new("B", "", "5901234123457"))
            .await
            .unwrap();

        let stats = catalog.stats(Utc::now()).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_secondary_ean, 1);
        assert_eq!(stats.secondary_ean_percent, 50);
        assert_eq!(stats.recently_added, 2);
        assert_eq!(stats.last_30_days_activity, 2);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Reject".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Reject));
        assert_eq!("allow".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Allow));
        assert!("maybe".parse::<DuplicatePolicy>().is_err());
    }
}
