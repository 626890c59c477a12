//! # Key-Value File Store
//!
//! The lightweight backend: the whole catalog lives in one JSON document
//! under two keys.
//!
//! ## Document Layout
//! ```text
//! {
//!   "products":        [ Product, ... ]        insertion order, oldest first
//!   "product_history": [ ActivityEntry, ... ]  newest first, at most 100
//! }
//! ```
//!
//! ## Write Cycle
//! ```text
//! lock ──► clone document ──► apply change ──► write file.tmp ──► rename ──► swap in
//! ```
//! The mutex is held for the whole cycle, so read-modify-write sequences
//! never interleave. A failed write leaves both the file and the in-memory
//! copy untouched.
//!
//! Unlike SQLite, the history here is trimmed on append: entry 101 pushes
//! out the oldest one for good.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stockroom_core::{ActivityEntry, Product, ProductInput, ACTIVITY_LIMIT};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::store::{now, touched_after, ProductStore};

/// Maximum number of activity entries kept in the document.
pub const HISTORY_CAP: usize = ACTIVITY_LIMIT as usize;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    products: Vec<Product>,

    #[serde(default)]
    product_history: Vec<ActivityEntry>,
}

/// [`ProductStore`] persisted as a single JSON file (or kept in memory).
///
/// Cloning is cheap: clones share the same document.
#[derive(Debug, Clone)]
pub struct LocalStore {
    document: Arc<Mutex<Document>>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        LocalStore {
            document: Arc::new(Mutex::new(Document::default())),
            path: None,
        }
    }

    /// Opens the store at `path`, starting empty if the file doesn't exist.
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        info!(path = %path.display(), "Opening key-value store");

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Document::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                Document::default()
            }
            Err(err) => return Err(err.into()),
        };

        debug!(
            products = document.products.len(),
            history = document.product_history.len(),
            "Key-value store loaded"
        );

        Ok(LocalStore {
            document: Arc::new(Mutex::new(document)),
            path: Some(path),
        })
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, document: &Document) -> DbResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Applies `change` to a copy of the document, persists it, then makes
    /// it current. Nothing changes if `change` or the write fails.
    async fn mutate<T: Send>(
        &self,
        change: impl FnOnce(&mut Document) -> DbResult<T> + Send,
    ) -> DbResult<T> {
        let mut guard = self.document.lock().await;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

impl ProductStore for LocalStore {
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        let document = self.document.lock().await;
        let mut products: Vec<Product> = document.products.iter().rev().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let document = self.document.lock().await;
        Ok(document.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, input: &ProductInput) -> DbResult<Product> {
        let at = now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            code: input.code.clone(),
            description: input.description.clone(),
            ean_primary: input.ean_primary.clone(),
            ean_secondary: input.ean_secondary.clone(),
            created_at: at,
            updated_at: at,
        };
        debug!(id = %product.id, code = %product.code, "Inserting product");

        let stored = product.clone();
        self.mutate(move |doc| {
            doc.products.push(stored);
            Ok(())
        })
        .await?;

        Ok(product)
    }

    async fn update_product(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
        debug!(id = %id, "Updating product");
        let input = input.clone();
        let id = id.to_string();

        self.mutate(move |doc| {
            let product = doc
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| DbError::not_found("Product", &id))?;

            product.code = input.code;
            product.description = input.description;
            product.ean_primary = input.ean_primary;
            product.ean_secondary = input.ean_secondary;
            product.updated_at = touched_after(product.updated_at);
            Ok(product.clone())
        })
        .await
    }

    async fn delete_product(&self, id: &str) -> DbResult<Product> {
        debug!(id = %id, "Deleting product");
        let id = id.to_string();

        self.mutate(move |doc| {
            let index = doc
                .products
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| DbError::not_found("Product", &id))?;
            Ok(doc.products.remove(index))
        })
        .await
    }

    async fn find_by_ean(&self, ean: &str, exclude_id: Option<&str>) -> DbResult<Option<Product>> {
        let document = self.document.lock().await;
        Ok(document
            .products
            .iter()
            .find(|p| p.ean_primary == ean && Some(p.id.as_str()) != exclude_id)
            .cloned())
    }

    async fn append_activity(&self, entry: &ActivityEntry) -> DbResult<()> {
        debug!(id = %entry.id, action = %entry.action, "Appending activity entry");
        let entry = entry.clone();

        self.mutate(move |doc| {
            doc.product_history.insert(0, entry);
            doc.product_history.truncate(HISTORY_CAP);
            Ok(())
        })
        .await
    }

    async fn list_activity(&self, limit: u32) -> DbResult<Vec<ActivityEntry>> {
        let document = self.document.lock().await;
        Ok(document
            .product_history
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        match self.path.as_deref().and_then(Path::parent) {
            Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::metadata(dir).await.is_ok(),
            _ => true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
