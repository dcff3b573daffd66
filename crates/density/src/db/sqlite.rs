//! SQLite implementation of the `DensityStore` trait.

use crate::db::models::DensityRow;
use crate::error::{DensityError, DensityResult};
use crate::filter::{FilterQuery, SqlParam};
use crate::store::{validate_records, DensityStore};
use crate::types::{DensityRecord, DENSITY_TABLE};
use async_trait::async_trait;
use config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// SQLite-backed density store.
#[derive(Debug, Clone)]
pub struct SqliteDensityStore {
    pool: SqlitePool,
}

impl SqliteDensityStore {
    /// Open (creating if needed) the database file named in `config`.
    pub async fn connect(config: &DatabaseConfig) -> DensityResult<Self> {
        let path = Path::new(&config.path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DensityError::storage("Failed to create database directory", e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| DensityError::storage("Failed to open database", e))?;

        info!("Opened SQLite database at '{}'", config.path);

        Ok(Self { pool })
    }

    /// A private in-memory database. Every pooled connection to
    /// `sqlite::memory:` is a separate database, so the pool holds exactly one
    /// connection and never recycles it.
    pub async fn in_memory() -> DensityResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DensityError::storage("Invalid in-memory database URL", e))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DensityError::storage("Failed to open in-memory database", e))?;

        Ok(Self { pool })
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn create_table_sql() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             census_tract TEXT PRIMARY KEY, \
             branch_count INTEGER, \
             PM25 REAL)",
            DENSITY_TABLE
        )
    }
}

#[async_trait]
impl DensityStore for SqliteDensityStore {
    #[instrument(skip(self))]
    async fn is_initialized(&self) -> DensityResult<bool> {
        let tables = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(DENSITY_TABLE)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DensityError::storage("Failed to inspect schema", e))?;

        Ok(tables > 0)
    }

    #[instrument(skip(self))]
    async fn ensure_schema(&self) -> DensityResult<()> {
        sqlx::query(&Self::create_table_sql())
            .execute(&self.pool)
            .await
            .map_err(|e| DensityError::storage("Failed to create density table", e))?;

        debug!("Ensured table '{}' exists", DENSITY_TABLE);
        Ok(())
    }

    #[instrument(skip(self, records), fields(records = records.len()))]
    async fn replace_dataset(&self, records: Vec<DensityRecord>) -> DensityResult<usize> {
        validate_records(&records)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DensityError::storage("Failed to begin transaction", e))?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", DENSITY_TABLE))
            .execute(&mut *tx)
            .await
            .map_err(|e| DensityError::storage("Failed to drop density table", e))?;

        sqlx::query(&Self::create_table_sql())
            .execute(&mut *tx)
            .await
            .map_err(|e| DensityError::storage("Failed to create density table", e))?;

        let insert = format!(
            "INSERT INTO {} (census_tract, branch_count, PM25) VALUES (?, ?, ?)",
            DENSITY_TABLE
        );
        for record in &records {
            let row = DensityRow::from(record);
            sqlx::query(&insert)
                .bind(row.census_tract)
                .bind(row.branch_count)
                .bind(row.pm25)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DensityError::storage(
                        &format!("Failed to insert tract '{}'", record.census_tract),
                        e,
                    )
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| DensityError::storage("Failed to commit dataset", e))?;

        info!("Replaced {} with {} rows", DENSITY_TABLE, records.len());
        Ok(records.len())
    }

    #[instrument(skip(self), fields(sql = %query.sql))]
    async fn query(&self, query: &FilterQuery) -> DensityResult<Vec<DensityRecord>> {
        let mut q = sqlx::query_as::<_, DensityRow>(&query.sql);
        for param in &query.params {
            q = match param {
                SqlParam::Text(value) => q.bind(value.clone()),
                SqlParam::Real(value) => q.bind(*value),
                SqlParam::Integer(value) => q.bind(*value),
            };
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DensityError::storage("Failed to query density table", e))?;

        debug!("Query returned {} rows", rows.len());
        Ok(rows.into_iter().map(DensityRow::to_domain).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> DensityResult<usize> {
        let rows = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", DENSITY_TABLE))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DensityError::storage("Failed to count rows", e))?;

        Ok(rows.max(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DensityFilter;
    use assert_matches::assert_matches;

    fn sample() -> Vec<DensityRecord> {
        vec![
            DensityRecord::new("17031010100", 6, Some(11.2)),
            DensityRecord::new("17031010200", 0, Some(9.8)),
            DensityRecord::new("17031010300", 12, None),
        ]
    }

    #[tokio::test]
    async fn test_schema_lifecycle() {
        let store = SqliteDensityStore::in_memory().await.unwrap();
        assert!(!store.is_initialized().await.unwrap());

        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
        assert!(store.is_initialized().await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_dataset_discards_previous_rows() {
        let store = SqliteDensityStore::in_memory().await.unwrap();

        assert_eq!(store.replace_dataset(sample()).await.unwrap(), 3);
        let written = store
            .replace_dataset(vec![DensityRecord::new("17031020100", 1, Some(7.0))])
            .await
            .unwrap();
        assert_eq!(written, 1);

        let all = store.query(&DensityFilter::new().build_query()).await.unwrap();
        assert_eq!(all, vec![DensityRecord::new("17031020100", 1, Some(7.0))]);
    }

    #[tokio::test]
    async fn test_duplicate_tracts_leave_table_untouched() {
        let store = SqliteDensityStore::in_memory().await.unwrap();
        store.replace_dataset(sample()).await.unwrap();

        let result = store
            .replace_dataset(vec![
                DensityRecord::new("A", 1, None),
                DensityRecord::new("A", 2, None),
            ])
            .await;
        assert_matches!(result, Err(DensityError::DuplicateTract(_)));
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_query_binds_params_in_clause_order() {
        let store = SqliteDensityStore::in_memory().await.unwrap();
        store.replace_dataset(sample()).await.unwrap();

        let filter = DensityFilter::new()
            .with_tracts(["17031010100", "17031010300"])
            .with_branch_threshold(5);
        let rows = store.query(&filter.build_query()).await.unwrap();
        assert_eq!(rows.len(), 2);

        // a null reading never passes a PM2.5 threshold
        let filter = DensityFilter::new().with_pm25_threshold(0.0);
        let rows = store.query(&filter.build_query()).await.unwrap();
        assert!(rows.iter().all(|r| r.pm25.is_some()));
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_query_without_table_is_storage_error() {
        let store = SqliteDensityStore::in_memory().await.unwrap();
        let result = store.query(&DensityFilter::new().build_query()).await;
        assert_matches!(result, Err(DensityError::StorageError(_)));
    }

    #[tokio::test]
    async fn test_connect_creates_file_and_parent_dir() {
        let dir = std::env::temp_dir().join(format!("ncif-sqlite-{}", std::process::id()));
        let path = dir.join("nested").join("density.db");
        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            max_connections: 2,
        };

        let store = SqliteDensityStore::connect(&config).await.unwrap();
        store.ensure_schema().await.unwrap();
        assert!(path.exists());

        store.pool().close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }
}
