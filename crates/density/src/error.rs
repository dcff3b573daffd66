//! Error types for the density crate.

use thiserror::Error;

/// Result type alias for density operations.
pub type DensityResult<T> = Result<T, DensityError>;

/// Errors that can occur while storing or querying density records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DensityError {
    /// Underlying storage engine failure.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Two records in one dataset share a census tract.
    #[error("Duplicate census tract in dataset: {0}")]
    DuplicateTract(String),

    /// A record breaks a table invariant.
    #[error("Invalid record for tract '{tract}': {message}")]
    InvalidRecord { tract: String, message: String },

    /// A filter parameter could not be parsed.
    #[error("Invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl DensityError {
    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        DensityError::StorageError(format!("{}: {}", context, err))
    }
}
