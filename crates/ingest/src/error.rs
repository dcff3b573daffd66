//! Error types for the ingestion run.

use density::DensityError;
use thiserror::Error;

pub type IngestResult<T> = Result<T, IngestError>;

/// Every variant aborts the run; nothing is written unless all sheets load.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open workbook '{path}': {message}")]
    WorkbookOpen { path: String, message: String },

    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Failed to read sheet '{sheet}': {message}")]
    SheetRead { sheet: String, message: String },

    #[error("Sheet '{sheet}' has no header row")]
    EmptySheet { sheet: String },

    #[error("Column '{column}' not found in sheet '{sheet}' (headers: {})", .found.join(", "))]
    MissingColumn {
        sheet: String,
        column: String,
        found: Vec<String>,
    },

    #[error("Ingestion task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Storage(#[from] DensityError),
}
