//! Error types for the chart client.

use std::path::PathBuf;
use thiserror::Error;

pub type VisualizeResult<T> = Result<T, VisualizeError>;

#[derive(Error, Debug)]
pub enum VisualizeError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    /// The unfiltered fetch returned nothing, so there is nothing to chart.
    #[error("No data retrieved from the API")]
    NoData,

    #[error("Failed to render chart '{chart}': {message}")]
    Render { chart: &'static str, message: String },

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VisualizeError {
    pub fn render(chart: &'static str, err: impl std::fmt::Display) -> Self {
        VisualizeError::Render {
            chart,
            message: err.to_string(),
        }
    }
}
