use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Root of the YAML configuration file.
///
/// Every section is optional in the file; missing sections and fields fall
/// back to the values in [`defaults`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MasterConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default = "default_service_version")]
    pub version: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            version: default_service_version(),
        }
    }
}

/// Location and pool sizing of the SQLite database file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Bind address of the HTTP API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

/// Workbook location and the sheet/column names read by the ingestion run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default = "default_workbook_path")]
    pub workbook: String,
    #[serde(default)]
    pub air_quality: AirQualitySheetConfig,
    #[serde(default = "default_bank_sheet")]
    pub bank_branches: BranchSheetConfig,
    #[serde(default = "default_credit_union_sheet")]
    pub credit_union_branches: BranchSheetConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workbook: default_workbook_path(),
            air_quality: AirQualitySheetConfig::default(),
            bank_branches: default_bank_sheet(),
            credit_union_branches: default_credit_union_sheet(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirQualitySheetConfig {
    #[serde(default = "default_air_quality_sheet_name")]
    pub sheet: String,
    #[serde(default = "default_tract_column")]
    pub tract_column: String,
    #[serde(default = "default_air_quality_value_column")]
    pub value_column: String,
}

impl Default for AirQualitySheetConfig {
    fn default() -> Self {
        Self {
            sheet: default_air_quality_sheet_name(),
            tract_column: default_tract_column(),
            value_column: default_air_quality_value_column(),
        }
    }
}

/// A sheet listing one branch location per row.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BranchSheetConfig {
    pub sheet: String,
    #[serde(default = "default_tract_column")]
    pub tract_column: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_pm25_threshold")]
    pub pm25_threshold: f64,
    #[serde(default = "default_branch_threshold")]
    pub branch_threshold: i64,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_request_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            output_dir: default_output_dir(),
            pm25_threshold: default_pm25_threshold(),
            branch_threshold: default_branch_threshold(),
            histogram_bins: default_histogram_bins(),
            timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of `pretty`, `json` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// Port for the Prometheus exporter; metrics are not exported when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}
