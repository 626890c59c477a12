//! # Product Store Abstraction
//!
//! One interface over the two persistence backends.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ProductStore (trait)                            │
//! │                                                                         │
//! │   ┌──────────────────────────┐        ┌──────────────────────────┐     │
//! │   │ SqliteStore              │        │ LocalStore (local.rs)    │     │
//! │   │  Database + repositories │        │  JSON key-value document │     │
//! │   │  full activity history   │        │  history capped at 100   │     │
//! │   └──────────────────────────┘        └──────────────────────────┘     │
//! │                                                                         │
//! │   AnyStore: enum over both, picked from configuration at startup.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method returns a `Send` future so a store can be shared across the
//! server's worker threads behind an `Arc`.

use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use stockroom_core::{ActivityEntry, Product, ProductInput};

use crate::error::DbResult;
use crate::local::LocalStore;
use crate::pool::Database;

/// Current time truncated to whole milliseconds, the resolution every
/// backend stores.
pub fn now() -> DateTime<Utc> {
    let at = Utc::now();
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

/// Timestamp for an edit of a row last touched at `previous`.
///
/// Strictly after `previous` even when two edits land in the same
/// millisecond.
pub fn touched_after(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous + TimeDelta::milliseconds(1))
}

// =============================================================================
// Trait
// =============================================================================

/// Persistence operations the catalog needs.
///
/// Stores assign IDs and timestamps. They do not validate barcodes and do
/// not write activity entries on their own; the [`Catalog`](crate::Catalog)
/// does both.
pub trait ProductStore: Send + Sync {
    /// All products, newest-created first.
    fn list_products(&self) -> impl Future<Output = DbResult<Vec<Product>>> + Send;

    fn get_product(&self, id: &str) -> impl Future<Output = DbResult<Option<Product>>> + Send;

    /// Creates a product with a fresh ID and `created_at == updated_at`.
    fn insert_product(&self, input: &ProductInput) -> impl Future<Output = DbResult<Product>> + Send;

    /// Overwrites the editable fields and refreshes `updated_at`.
    /// Fails with `NotFound` for an unknown ID.
    fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
    ) -> impl Future<Output = DbResult<Product>> + Send;

    /// Removes a product and returns it. Fails with `NotFound` for an unknown ID.
    fn delete_product(&self, id: &str) -> impl Future<Output = DbResult<Product>> + Send;

    /// First product whose primary barcode equals `ean`, skipping `exclude_id`.
    fn find_by_ean(
        &self,
        ean: &str,
        exclude_id: Option<&str>,
    ) -> impl Future<Output = DbResult<Option<Product>>> + Send;

    fn append_activity(&self, entry: &ActivityEntry) -> impl Future<Output = DbResult<()>> + Send;

    /// Up to `limit` entries, most recent first.
    fn list_activity(&self, limit: u32) -> impl Future<Output = DbResult<Vec<ActivityEntry>>> + Send;

    /// Checks if the backend can serve requests.
    fn health_check(&self) -> impl Future<Output = bool> + Send;
}

// =============================================================================
// SQLite Backend
// =============================================================================

/// [`ProductStore`] backed by the SQLite repositories.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl ProductStore for SqliteStore {
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        self.db.products().list().await
    }

    async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        self.db.products().get_by_id(id).await
    }

    async fn insert_product(&self, input: &ProductInput) -> DbResult<Product> {
        self.db.products().insert(input).await
    }

    async fn update_product(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
        self.db.products().update(id, input).await
    }

    async fn delete_product(&self, id: &str) -> DbResult<Product> {
        self.db.products().delete(id).await
    }

    async fn find_by_ean(&self, ean: &str, exclude_id: Option<&str>) -> DbResult<Option<Product>> {
        self.db.products().find_by_ean(ean, exclude_id).await
    }

    async fn append_activity(&self, entry: &ActivityEntry) -> DbResult<()> {
        self.db.activity().append(entry).await
    }

    async fn list_activity(&self, limit: u32) -> DbResult<Vec<ActivityEntry>> {
        self.db.activity().list(limit).await
    }

    async fn health_check(&self) -> bool {
        self.db.health_check().await
    }
}

// =============================================================================
// Runtime-Selected Backend
// =============================================================================

/// Either backend, chosen at startup.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Sqlite(SqliteStore),
    Local(LocalStore),
}

impl AnyStore {
    /// Short backend name for logs and health output.
    pub fn backend_name(&self) -> &'static str {
        match self {
            AnyStore::Sqlite(_) => "sqlite",
            AnyStore::Local(_) => "local",
        }
    }
}

impl From<SqliteStore> for AnyStore {
    fn from(store: SqliteStore) -> Self {
        AnyStore::Sqlite(store)
    }
}

impl From<LocalStore> for AnyStore {
    fn from(store: LocalStore) -> Self {
        AnyStore::Local(store)
    }
}

impl ProductStore for AnyStore {
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        match self {
            AnyStore::Sqlite(s) => s.list_products().await,
            AnyStore::Local(s) => s.list_products().await,
        }
    }

    async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        match self {
            AnyStore::Sqlite(s) => s.get_product(id).await,
            AnyStore::Local(s) => s.get_product(id).await,
        }
    }

    async fn insert_product(&self, input: &ProductInput) -> DbResult<Product> {
        match self {
            AnyStore::Sqlite(s) => s.insert_product(input).await,
            AnyStore::Local(s) => s.insert_product(input).await,
        }
    }

    async fn update_product(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
        match self {
            AnyStore::Sqlite(s) => s.update_product(id, input).await,
            AnyStore::Local(s) => s.update_product(id, input).await,
        }
    }

    async fn delete_product(&self, id: &str) -> DbResult<Product> {
        match self {
            AnyStore::Sqlite(s) => s.delete_product(id).await,
            AnyStore::Local(s) => s.delete_product(id).await,
        }
    }

    async fn find_by_ean(&self, ean: &str, exclude_id: Option<&str>) -> DbResult<Option<Product>> {
        match self {
            AnyStore::Sqlite(s) => s.find_by_ean(ean, exclude_id).await,
            AnyStore::Local(s) => s.find_by_ean(ean, exclude_id).await,
        }
    }

    async fn append_activity(&self, entry: &ActivityEntry) -> DbResult<()> {
        match self {
            AnyStore::Sqlite(s) => s.append_activity(entry).await,
            AnyStore::Local(s) => s.append_activity(entry).await,
        }
    }

    async fn list_activity(&self, limit: u32) -> DbResult<Vec<ActivityEntry>> {
        match self {
            AnyStore::Sqlite(s) => s.list_activity(limit).await,
            AnyStore::Local(s) => s.list_activity(limit).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AnyStore::Sqlite(s) => s.health_check().await,
            AnyStore::Local(s) => s.health_check().await,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[test]
    fn test_now_is_millisecond_precise() {
        let at = now();
        assert_eq!(at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_touched_after_moves_forward() {
        let future = now() + TimeDelta::seconds(60);
        assert_eq!(touched_after(future), future + TimeDelta::milliseconds(1));

        let past = now() - TimeDelta::seconds(60);
        assert!(touched_after(past) > past + TimeDelta::seconds(59));
    }

    async fn assert_back_to_back_updates_advance(store: AnyStore) {
        let created = store
            .insert_product(&ProductInput::new("A", "B", "4006381333931"))
            .await
            .unwrap();

        let mut last = created.updated_at;
        for n in 0..20 {
            let input = ProductInput::new("A", format!("B{n}"), "4006381333931");
            let updated = store.update_product(&created.id, &input).await.unwrap();
            assert!(
                updated.updated_at > last,
                "{}: update {n} did not advance",
                store.backend_name()
            );
            last = updated.updated_at;
        }

        let stored = store.get_product(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.updated_at, last);
    }

    #[tokio::test]
    async fn test_updates_in_same_millisecond_still_advance() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_back_to_back_updates_advance(SqliteStore::new(db).into()).await;
        assert_back_to_back_updates_advance(LocalStore::in_memory().into()).await;
    }

    #[tokio::test]
    async fn test_any_store_delegates() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = AnyStore::from(SqliteStore::new(db));
        assert_eq!(store.backend_name(), "sqlite");
        assert!(store.health_check().await);

        let created = store
            .insert_product(&ProductInput::new("A", "B", "4006381333931"))
            .await
            .unwrap();
        let listed = store.list_products().await.unwrap();
        assert_eq!(listed, vec![created]);

        let local = AnyStore::from(LocalStore::in_memory());
        assert_eq!(local.backend_name(), "local");
        assert!(local.list_products().await.unwrap().is_empty());
    }
}
