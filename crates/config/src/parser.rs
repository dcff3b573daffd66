use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());
    parse_config(&content)
}

/// Parse configuration text after environment variable substitution.
pub fn parse_config(content: &str) -> Result<MasterConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    // An empty document means "all defaults"
    if substituted.trim().is_empty() {
        return Ok(MasterConfig::default());
    }

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Load the configuration file, or fall back to built-in defaults when the
/// file does not exist. Read and parse errors on an existing file still fail.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        warn!(
            "Configuration file {:?} not found, using built-in defaults",
            path
        );
        Ok(generate_default_config())
    }
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    MasterConfig {
        service: ServiceConfig::default(),
        database: DatabaseConfig::default(),
        server: HttpConfig::default(),
        ingest: IngestConfig::default(),
        visualization: VisualizationConfig::default(),
        logging: LoggingConfig::default(),
        monitoring: MonitoringConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ncif-config-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = parse_config(
            r#"
server:
  port: 9100
ingest:
  credit_union_branches:
    sheet: NCUA_2025
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "data/merged_data.db");
        assert_eq!(config.ingest.credit_union_branches.sheet, "NCUA_2025");
        // column falls back to the generic tract column name
        assert_eq!(config.ingest.credit_union_branches.tract_column, "census_tract");
        assert_eq!(config.ingest.bank_branches.sheet, "SOD_IL_2024");
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = parse_config("   \n").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.ingest.credit_union_branches.tract_column, "census tract");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(parse_config("server: [unclosed").is_err());
    }

    #[test]
    fn test_save_and_load_default_config() {
        let path = scratch_path("roundtrip.yaml");
        let config = generate_default_config();
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.visualization.histogram_bins, 20);
        assert_eq!(loaded.ingest.air_quality.value_column, "arithmetic_mean");
        assert_eq!(loaded.monitoring.metrics_port, None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = scratch_path("does-not-exist.yaml");
        let config = load_config_or_default(&path).unwrap();
        assert_eq!(config.database.max_connections, 4);
        assert!(load_config(&path).is_err());
    }
}
