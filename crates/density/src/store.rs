//! Storage trait for density records.

use crate::error::{DensityError, DensityResult};
use crate::filter::FilterQuery;
use crate::types::DensityRecord;
use async_trait::async_trait;
use std::collections::HashSet;

/// Storage abstraction for the density table.
///
/// The ingestion run is the only writer; the API only reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DensityStore: Send + Sync {
    /// Whether the density table exists.
    async fn is_initialized(&self) -> DensityResult<bool>;

    /// Create the density table if it does not exist. Idempotent.
    async fn ensure_schema(&self) -> DensityResult<()>;

    /// Drop the table and rewrite it from `records` in one transaction.
    ///
    /// Returns the number of rows written. Fails without touching the stored
    /// rows when `records` breaks a table invariant.
    async fn replace_dataset(&self, records: Vec<DensityRecord>) -> DensityResult<usize>;

    /// Run a read composed by [`DensityFilter`](crate::DensityFilter).
    async fn query(&self, query: &FilterQuery) -> DensityResult<Vec<DensityRecord>>;

    /// Number of stored rows.
    async fn count(&self) -> DensityResult<usize>;
}

/// Check the table invariants for a replacement dataset: non-empty, unique
/// tracts and non-negative branch counts.
pub fn validate_records(records: &[DensityRecord]) -> DensityResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());

    for record in records {
        if record.census_tract.trim().is_empty() {
            return Err(DensityError::InvalidRecord {
                tract: record.census_tract.clone(),
                message: "census tract must not be empty".to_string(),
            });
        }
        if record.branch_count < 0 {
            return Err(DensityError::InvalidRecord {
                tract: record.census_tract.clone(),
                message: format!("branch count {} is negative", record.branch_count),
            });
        }
        if !seen.insert(record.census_tract.as_str()) {
            return Err(DensityError::DuplicateTract(record.census_tract.clone()));
        }
    }

    Ok(())
}
