//! Database layer for density storage.
//!
//! SQLite-backed implementation of the `DensityStore` trait. One table,
//! `density_table`, rebuilt by every ingestion run.

pub mod models;
pub mod sqlite;

pub use models::DensityRow;
pub use sqlite::SqliteDensityStore;
