//! # Product Repository
//!
//! SQLite operations for products.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products row                        Product                            │
//! │  ─────────────────────────           ───────────────────────────        │
//! │  ean_secondary   NULL        ──►     ean_secondary   ""                 │
//! │  ean_secondary   '590...'    ──►     ean_secondary   "590..."           │
//! │  created_at      1709631000000 ──►   created_at      2024-03-05T09:30Z  │
//! │                                                                         │
//! │  Writes go the other way: "" is stored as NULL.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listing order is newest-created first; rows created in the same
//! millisecond fall back to insertion order (`rowid`).

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::{from_millis, to_millis};
use crate::error::{DbError, DbResult};
use crate::store::now;
use stockroom_core::{Product, ProductInput};

const PRODUCT_COLUMNS: &str =
    "id, code, description, ean_primary, ean_secondary, created_at, updated_at";

/// Raw `products` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    code: String,
    description: String,
    ean_primary: String,
    ean_secondary: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            id: row.id,
            code: row.code,
            description: row.description,
            ean_primary: row.ean_primary,
            ean_secondary: row.ean_secondary.unwrap_or_default(),
            created_at: from_millis(row.created_at)?,
            updated_at: from_millis(row.updated_at)?,
        })
    }
}

fn collect(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// `""` becomes SQL NULL.
fn nullable(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let created = repo.insert(&ProductInput::new("A-1", "Milk", "4006381333931")).await?;
/// let found = repo.get_by_id(&created.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        collect(rows)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Finds the oldest product whose primary barcode is `ean`, optionally
    /// ignoring one product (the one being edited).
    pub async fn find_by_ean(&self, ean: &str, exclude_id: Option<&str>) -> DbResult<Option<Product>> {
        debug!(ean = %ean, exclude_id = ?exclude_id, "Looking up product by EAN");

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE ean_primary = ?1 AND (?2 IS NULL OR id <> ?2)
            ORDER BY created_at ASC, rowid ASC
            LIMIT 1
            "#
        ))
        .bind(ean)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Inserts a new product, assigning its ID and timestamps.
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
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

        sqlx::query(
            r#"
            INSERT INTO products (
                id, code, description, ean_primary, ean_secondary, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.code)
        .bind(&product.description)
        .bind(&product.ean_primary)
        .bind(nullable(&product.ean_secondary))
        .bind(to_millis(&product.created_at))
        .bind(to_millis(&product.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Overwrites the editable fields and refreshes `updated_at`, always
    /// moving it at least one millisecond past the stored value.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product as stored after the update
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r#"
            UPDATE products SET
                code = ?2,
                description = ?3,
                ean_primary = ?4,
                ean_secondary = ?5,
                updated_at = MAX(?6, updated_at + 1)
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.code)
        .bind(&input.description)
        .bind(&input.ean_primary)
        .bind(nullable(&input.ean_secondary))
        .bind(to_millis(&now()))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Product::try_from(row),
            None => Err(DbError::not_found("Product", id)),
        }
    }

    /// Hard-deletes a product and returns what was removed.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The deleted product
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<Product> {
        debug!(id = %id, "Deleting product");

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM products WHERE id = ?1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Product::try_from(row),
            None => Err(DbError::not_found("Product", id)),
        }
    }

    /// Counts products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn repo() -> ProductRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let created = repo
            .insert(&ProductInput::new("A-1", "Milk", "4006381333931"))
            .await
            .unwrap();

        assert_eq!(created.created_at, created.updated_at);
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_secondary_is_stored_as_null() {
        let repo = repo().await;
        let created = repo
            .insert(&ProductInput::new("A-1", "Milk", "4006381333931"))
            .await
            .unwrap();

        let raw: Option<String> =
            sqlx::query_scalar("SELECT ean_secondary FROM products WHERE id = ?1")
                .bind(&created.id)
                .fetch_one(&repo.pool)
                .await
                .unwrap();
        assert!(raw.is_none());
        assert_eq!(created.ean_secondary, "");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = repo().await;
        for code in ["first", "second", "third"] {
            repo.insert(&ProductInput::new(code, "", "4006381333931"))
                .await
                .unwrap();
        }

        let codes: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.code).collect();
        assert_eq!(codes, vec!["third", "second", "first"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let repo = repo().await;
        let created = repo
            .insert(&ProductInput::new("A-1", "Milk", "4006381333931"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let input = ProductInput::new("A-1", "Milk 1L", "4006381333931").with_secondary("1234567890128");
        let updated = repo.update(&created.id, &input).await.unwrap();

        assert_eq!(updated.description, "Milk 1L");
        assert_eq!(updated.ean_secondary, "1234567890128");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_immediate_update_still_advances_timestamp() {
        let repo = repo().await;
        let created = repo
            .insert(&ProductInput::new("A-1", "Milk", "4006381333931"))
            .await
            .unwrap();

        let first = repo
            .update(&created.id, &ProductInput::new("A-1", "Milk 1L", "4006381333931"))
            .await
            .unwrap();
        let second = repo
            .update(&created.id, &ProductInput::new("A-1", "Milk 2L", "4006381333931"))
            .await
            .unwrap();

        assert!(first.updated_at > created.updated_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update("nope", &ProductInput::new("A", "", "4006381333931"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_product() {
        let repo = repo().await;
        let created = repo
            .insert(&ProductInput::new("A-1", "Milk", "4006381333931"))
            .await
            .unwrap();

        let deleted = repo.delete(&created.id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(repo.delete(&created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_ean_excludes_self() {
        let repo = repo().await;
        let a = repo
            .insert(&ProductInput::new("A", "", "4006381333931"))
            .await
            .unwrap();

        let hit = repo.find_by_ean("4006381333931", None).await.unwrap();
        assert_eq!(hit.map(|p| p.id), Some(a.id.clone()));
        assert!(repo
            .find_by_ean("4006381333931", Some(&a.id))
            .await
            .unwrap()
            .is_none());
        assert!(repo.find_by_ean("1234567890128", None).await.unwrap().is_none());
    }
}
