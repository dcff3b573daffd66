//! Request/response types for the density API.

use crate::types::DensityRecord;
use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str = "Welcome to the NCIF Data Integration API";

/// GET / response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}

/// POST /predict request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionRequest {
    pub branch_count: i64,
}

/// POST /predict response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub branch_count: i64,
    #[serde(rename = "predicted_PM2.5")]
    pub predicted_pm25: f64,
}

/// POST /query-nlp request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordQueryRequest {
    pub nlp_query: String,
}

/// Error object returned in-band by /query-nlp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryErrorBody {
    pub error: String,
}

/// POST /query-nlp response: matching records, or an error object with
/// status 200 when the query text could not be understood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeywordQueryResponse {
    Records(Vec<DensityRecord>),
    Error(QueryErrorBody),
}

/// Error response for rejected or failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
