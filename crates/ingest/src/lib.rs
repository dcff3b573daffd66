//! # Ingest Crate
//!
//! Offline load of the source workbook into the density table.
//!
//! ```text
//!   AirQuality sheet ─────────────────────────────┐
//!   Bank sheet ──────────┐                        ├─ left join ─▶ replace_dataset
//!   Credit union sheet ──┴─ concat ─ count/tract ─┘
//! ```
//!
//! The air-quality sheet defines which tracts exist. The run either writes a
//! complete new table or fails without touching the stored one.

pub mod error;
pub mod merge;
pub mod sheet;
pub mod workbook;

pub use error::{IngestError, IngestResult};
pub use merge::{
    count_branches, merge_sources, AirQualityReading, BranchLocation, BranchType, IngestSummary,
    SourceTables,
};

use config::IngestConfig;
use density::DensityStore;
use tracing::info;

/// Load the configured workbook and rebuild the density table from it.
pub async fn run_ingestion(
    config: &IngestConfig,
    store: &dyn DensityStore,
) -> IngestResult<IngestSummary> {
    let config = config.clone();
    let sources = tokio::task::spawn_blocking(move || workbook::load_sources(&config))
        .await
        .map_err(|e| IngestError::Task(e.to_string()))??;

    ingest_sources(&sources, store).await
}

/// Merge already-loaded source rows and write the result.
pub async fn ingest_sources(
    sources: &SourceTables,
    store: &dyn DensityStore,
) -> IngestResult<IngestSummary> {
    let (records, summary) = merge_sources(sources);

    store.ensure_schema().await?;
    let written = store.replace_dataset(records).await?;

    info!(
        written,
        air_quality_rows = summary.air_quality_rows,
        bank_rows = summary.bank_rows,
        credit_union_rows = summary.credit_union_rows,
        zero_branch_tracts = summary.tracts_without_branches,
        dropped_branch_tracts = summary.dropped_branch_tracts,
        "Density table rebuilt"
    );
    Ok(summary)
}
