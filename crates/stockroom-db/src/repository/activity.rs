//! # Activity Repository
//!
//! Append-only storage for the activity log.
//!
//! `changes` and `previous_values` are stored as JSON text. The product code
//! and description are also copied into their own columns so the log stays
//! readable with plain SQL after the product is gone.

use sqlx::SqlitePool;
use tracing::debug;

use super::{from_millis, to_millis};
use crate::error::{DbError, DbResult};
use stockroom_core::{ActivityAction, ActivityEntry, ProductChanges};

/// Raw `activity_history` row.
#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: String,
    product_id: String,
    action: ActivityAction,
    changes: String,
    previous_values: Option<String>,
    timestamp: i64,
}

impl TryFrom<ActivityRow> for ActivityEntry {
    type Error = DbError;

    fn try_from(row: ActivityRow) -> DbResult<Self> {
        let changes: ProductChanges = serde_json::from_str(&row.changes)?;
        let previous_values = row
            .previous_values
            .as_deref()
            .map(serde_json::from_str::<ProductChanges>)
            .transpose()?;

        Ok(ActivityEntry {
            id: row.id,
            product_id: row.product_id,
            action: row.action,
            timestamp: from_millis(row.timestamp)?,
            changes,
            previous_values,
        })
    }
}

/// Repository for the activity log.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: SqlitePool,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityRepository { pool }
    }

    /// Appends one entry. Entries are never updated afterwards.
    pub async fn append(&self, entry: &ActivityEntry) -> DbResult<()> {
        debug!(
            id = %entry.id,
            product_id = %entry.product_id,
            action = %entry.action,
            "Appending activity entry"
        );

        let changes = serde_json::to_string(&entry.changes)?;
        let previous_values = entry
            .previous_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO activity_history (
                id, product_id, action, product_code, product_description,
                changes, previous_values, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.product_id)
        .bind(entry.action)
        .bind(entry.changes.code.as_deref().unwrap_or_default())
        .bind(entry.changes.description.as_deref().unwrap_or_default())
        .bind(changes)
        .bind(previous_values)
        .bind(to_millis(&entry.timestamp))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists up to `limit` entries, most recent first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<ActivityEntry>> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, action, changes, previous_values, timestamp
            FROM activity_history
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), limit = limit, "Listed activity entries");
        rows.into_iter().map(ActivityEntry::try_from).collect()
    }

    /// Counts every stored entry, including ones past the listing limit.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_history")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
