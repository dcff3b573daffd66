use crate::*;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Database path is required")]
    MissingDatabasePath,

    #[error("database.max_connections must be at least 1")]
    InvalidMaxConnections,

    #[error("Server host is required")]
    MissingHost,

    #[error("Server port must be non-zero")]
    InvalidPort,

    #[error("Ingest workbook path is required")]
    MissingWorkbook,

    #[error("Sheet '{sheet}': {message}")]
    InvalidSheet { sheet: String, message: String },

    #[error("Invalid visualization base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Environment variable placeholder left unresolved in {field}: {value}")]
    UnresolvedEnvVar { field: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_database(&config.database, &mut report);
    validate_server(&config.server, &mut report);
    validate_ingest(&config.ingest, &mut report);
    validate_visualization(&config.visualization, &mut report);

    if !LOG_FORMATS.contains(&config.logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(config.logging.format.clone()));
    }

    if let Some(port) = config.monitoring.metrics_port {
        if port == config.server.port {
            report.add_warning(
                "monitoring.metrics_port",
                "Metrics port equals the API port; the exporter will fail to bind",
            );
        }
    }

    report
}

fn check_env_placeholder(field: &str, value: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(value) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn validate_database(database: &DatabaseConfig, report: &mut ValidationReport) {
    if database.path.trim().is_empty() {
        report.add_error(ValidationError::MissingDatabasePath);
    }
    check_env_placeholder("database.path", &database.path, report);

    if database.max_connections == 0 {
        report.add_error(ValidationError::InvalidMaxConnections);
    }
}

fn validate_server(server: &HttpConfig, report: &mut ValidationReport) {
    if server.host.trim().is_empty() {
        report.add_error(ValidationError::MissingHost);
    }
    check_env_placeholder("server.host", &server.host, report);

    if server.port == 0 {
        report.add_error(ValidationError::InvalidPort);
    } else if server.port < 1024 {
        report.add_warning(
            "server.port",
            "Ports below 1024 usually require elevated privileges",
        );
    }
}

fn validate_ingest(ingest: &IngestConfig, report: &mut ValidationReport) {
    if ingest.workbook.trim().is_empty() {
        report.add_error(ValidationError::MissingWorkbook);
    }
    check_env_placeholder("ingest.workbook", &ingest.workbook, report);

    let air = &ingest.air_quality;
    let sheets = [
        (&air.sheet, vec![&air.tract_column, &air.value_column]),
        (
            &ingest.bank_branches.sheet,
            vec![&ingest.bank_branches.tract_column],
        ),
        (
            &ingest.credit_union_branches.sheet,
            vec![&ingest.credit_union_branches.tract_column],
        ),
    ];

    for (sheet, columns) in sheets {
        if sheet.trim().is_empty() {
            report.add_error(ValidationError::InvalidSheet {
                sheet: sheet.clone(),
                message: "sheet name is required".to_string(),
            });
        }
        if columns.iter().any(|c| c.trim().is_empty()) {
            report.add_error(ValidationError::InvalidSheet {
                sheet: sheet.clone(),
                message: "column names must not be empty".to_string(),
            });
        }
    }

    if ingest.bank_branches.sheet == ingest.credit_union_branches.sheet {
        report.add_warning(
            "ingest.credit_union_branches.sheet",
            "Bank and credit union branches read the same sheet; branches will be counted twice",
        );
    }
}

fn validate_visualization(viz: &VisualizationConfig, report: &mut ValidationReport) {
    match Url::parse(&viz.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => report.add_error(ValidationError::InvalidBaseUrl {
            url: viz.base_url.clone(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => report.add_error(ValidationError::InvalidBaseUrl {
            url: viz.base_url.clone(),
            message: e.to_string(),
        }),
    }

    if viz.histogram_bins == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "visualization.histogram_bins".to_string(),
        });
    }
    if viz.timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "visualization.timeout_seconds".to_string(),
        });
    }

    if !viz.pm25_threshold.is_finite() || viz.pm25_threshold < 0.0 {
        report.add_warning(
            "visualization.pm25_threshold",
            "Threshold is negative or not finite; the filtered chart will not narrow anything",
        );
    }
    if viz.branch_threshold < 0 {
        report.add_warning(
            "visualization.branch_threshold",
            "Branch counts are never negative; a negative threshold matches every tract",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut config = generate_default_config();
        config.database.path = String::new();
        config.database.max_connections = 0;
        config.server.port = 0;
        config.visualization.base_url = "ftp://example.org".to_string();
        config.visualization.histogram_bins = 0;
        config.logging.format = "xml".to_string();

        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert!(report.errors.contains(&ValidationError::MissingDatabasePath));
        assert!(report.errors.contains(&ValidationError::InvalidMaxConnections));
        assert!(report.errors.contains(&ValidationError::InvalidPort));
        assert!(report
            .errors
            .contains(&ValidationError::InvalidLogFormat("xml".to_string())));
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut config = generate_default_config();
        config.server.port = 80;
        config.visualization.branch_threshold = -1;
        config.ingest.credit_union_branches.sheet = config.ingest.bank_branches.sheet.clone();

        let report = validate_config(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_unresolved_placeholder_is_error() {
        let mut config = generate_default_config();
        config.database.path = "${NCIF_DB_PATH_NOT_SET}".to_string();

        let report = validate_config(&config);
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnresolvedEnvVar { field, .. } if field == "database.path")));
    }
}
