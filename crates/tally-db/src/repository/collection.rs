//! # Collection Repository
//!
//! Key-value access to the `collections` table. One row per ledger
//! collection; the payload is the whole collection as JSON text.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for collection payloads.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.collections();
/// repo.save("sales", "[]").await?;
/// let payload = repo.load("sales").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    pool: SqlitePool,
}

impl CollectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CollectionRepository { pool }
    }

    /// Stored payload under `key`, or `None` if nothing was ever saved.
    pub async fn load(&self, key: &str) -> DbResult<Option<String>> {
        let payload: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM collections WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payload.map(|(payload,)| payload))
    }

    /// Inserts or replaces the payload under `key`.
    pub async fn save(&self, key: &str, payload: &str) -> DbResult<()> {
        debug!(key = %key, bytes = payload.len(), "Saving collection");

        sqlx::query(
            r#"
            INSERT INTO collections (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Saves several collections in one transaction: all or none.
    pub async fn save_all(&self, entries: &[(&str, String)]) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        for (key, payload) in entries {
            debug!(key = %key, bytes = payload.len(), "Saving collection");
            sqlx::query(
                r#"
                INSERT INTO collections (key, payload, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(payload)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Deletes the payload under `key`. Returns whether a row existed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM collections WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every stored key, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<(String,)> = sqlx::query_as("SELECT key FROM collections ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys.into_iter().map(|(key,)| key).collect())
    }
}
