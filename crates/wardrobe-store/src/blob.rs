//! Large-blob store for full-resolution images.
//!
//! Blobs are keyed by the same ids as items and outfits but are not part of
//! the [`crate::Document`]. Nothing here checks that a key still belongs to a
//! live entity; call [`BlobStore::retain`] with the document's live ids to
//! drop orphans.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Async key-value store over SQLite.
#[derive(Debug, Clone)]
pub struct BlobStore {
    pool: SqlitePool,
}

impl BlobStore {
    /// Default pool size. Blob traffic is one user clicking through images.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Connect to a SQLite database and apply migrations.
    ///
    /// The URL should be in the format `sqlite:path/to/blobs.db?mode=rwc`.
    /// Use `sqlite::memory:` in tests.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?;
        let store = Self::connect_with(options).await?;
        info!("Connected to blob store: {}", url);
        Ok(store)
    }

    /// Open the database file at `path`, creating it if missing.
    ///
    /// The path is used as-is, so `?` and `#` in directory names are safe.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let store = Self::connect_with(SqliteConnectOptions::new().filename(path)).await?;
        info!(path = %path.display(), "Opened blob store");
        Ok(store)
    }

    /// Connect with explicit options and apply migrations.
    pub async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(Self::DEFAULT_POOL_SIZE)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options.create_if_missing(true))
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Insert or replace the blob stored under `id`.
    pub async fn save(&self, id: &str, data: &[u8]) -> Result<()> {
        sqlx::query(UPSERT).bind(id).bind(data).execute(&self.pool).await?;
        debug!(id, bytes = data.len(), "Saved blob");
        Ok(())
    }

    /// Fetch the blob stored under `id`, if any.
    pub async fn load(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let data = sqlx::query_scalar::<_, Vec<u8>>(
            r#"
            SELECT data FROM blobs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(data)
    }

    /// Delete the blob stored under `id`.
    ///
    /// Returns true if a blob was deleted, false if none existed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM blobs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every stored blob keyed by id.
    ///
    /// Keys and values come from two bulk reads inside one transaction and
    /// are paired by position, so both reads see the same snapshot.
    pub async fn get_all(&self) -> Result<HashMap<String, Vec<u8>>> {
        let mut tx = self.pool.begin().await?;

        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM blobs ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;
        let payloads = sqlx::query_scalar::<_, Vec<u8>>("SELECT data FROM blobs ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        if ids.len() != payloads.len() {
            return Err(StoreError::InvalidDocument(format!(
                "blob snapshot mismatch: {} keys, {} values",
                ids.len(),
                payloads.len()
            )));
        }

        Ok(ids.into_iter().zip(payloads).collect())
    }

    /// Upsert every entry in one transaction.
    ///
    /// If any put fails the transaction is rolled back and nothing is written.
    pub async fn put_all(&self, blobs: &HashMap<String, Vec<u8>>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (id, data) in blobs {
            sqlx::query(UPSERT)
                .bind(id.as_str())
                .bind(data.as_slice())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(count = blobs.len(), "Imported blobs");
        Ok(())
    }

    /// Delete every blob whose id is not in `live_ids`.
    ///
    /// Returns the number of blobs removed.
    pub async fn retain(&self, live_ids: &HashSet<String>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let ids = sqlx::query_scalar::<_, String>("SELECT id FROM blobs")
            .fetch_all(&mut *tx)
            .await?;

        let mut removed = 0;
        for id in ids.iter().filter(|id| !live_ids.contains(*id)) {
            let result = sqlx::query("DELETE FROM blobs WHERE id = ?")
                .bind(id.as_str())
                .execute(&mut *tx)
                .await?;
            removed += result.rows_affected();
        }

        tx.commit().await?;

        if removed > 0 {
            info!(removed, "Pruned orphaned blobs");
        }
        Ok(removed)
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

const UPSERT: &str = r#"
    INSERT INTO blobs (id, data)
    VALUES (?, ?)
    ON CONFLICT(id) DO UPDATE SET
        data = excluded.data,
        updated_at = datetime('now')
"#;
