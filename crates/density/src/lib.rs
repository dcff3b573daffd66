//! # Density Crate
//!
//! Per-census-tract density records (branch count and PM2.5 reading) and
//! everything that reads or writes them.
//!
//! ## Key Components
//!
//! - **Domain Types**: [`DensityRecord`]
//! - **Filtering**: [`DensityFilter`] composes the parameterised read used by
//!   both `/density` and `/query-nlp`
//! - **Storage**: the [`DensityStore`] trait, with a SQLite implementation
//!   behind the `sqlite` feature
//! - **Keyword queries**: a fixed-grammar matcher for the two supported phrases
//! - **Prediction**: a deterministic placeholder model
//! - **HTTP API**: axum handlers and routes behind the `api` feature
//!
//! ```text
//!   ingest ──replace_dataset──▶ DensityStore ◀──query── api handlers
//!                                   │
//!                          SqliteDensityStore (density_table)
//! ```

pub mod error;
pub mod filter;
pub mod keyword_query;
pub mod prediction;
pub mod store;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod db;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for convenience
pub use error::{DensityError, DensityResult};
pub use filter::{DensityFilter, FilterQuery, SqlParam};
pub use keyword_query::{parse_keyword_query, KeywordQueryError, ThresholdQuery};
pub use prediction::{LinearMockModel, PredictionModel};
pub use store::DensityStore;
pub use types::{DensityRecord, DENSITY_TABLE};

#[cfg(feature = "sqlite")]
pub use db::SqliteDensityStore;
