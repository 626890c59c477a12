//! # Application State
//!
//! Shared by every handler through axum's `State` extractor.
//!
//! ```text
//! ServerConfig ──► AppState::open ──► Catalog<AnyStore> ──► Arc (cloned per request)
//!                        │
//!                        ├── sqlite ──► Database::new (migrations run)
//!                        └── local  ──► LocalStore::open (file read)
//! ```

use std::sync::Arc;

use stockroom_db::{AnyStore, Catalog, Database, DbConfig, DbResult, LocalStore, SqliteStore};
use tracing::info;

use crate::config::{ServerConfig, StorageBackend};

/// Handle to the catalog. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<Catalog<AnyStore>>,
}

impl AppState {
    pub fn new(catalog: Catalog<AnyStore>) -> Self {
        AppState {
            catalog: Arc::new(catalog),
        }
    }

    /// Opens the configured backend and wraps it in a catalog.
    pub async fn open(config: &ServerConfig) -> DbResult<Self> {
        let path = config.storage.resolved_path();

        let store: AnyStore = match config.storage.backend {
            StorageBackend::Sqlite => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                SqliteStore::new(Database::new(DbConfig::new(&path)).await?).into()
            }
            StorageBackend::Local => LocalStore::open(&path).await?.into(),
        };

        info!(
            backend = store.backend_name(),
            path = %path.display(),
            duplicate_policy = ?config.catalog.duplicate_policy,
            "Store ready"
        );

        Ok(AppState::new(
            Catalog::new(store).with_policy(config.catalog.duplicate_policy),
        ))
    }

    pub fn catalog(&self) -> &Catalog<AnyStore> {
        &self.catalog
    }
}
