//! NCIF command-line entry point
//!
//! `ingest` rebuilds the density table from the workbook, `serve` exposes it
//! over HTTP and `visualize` renders charts from a running server.

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{
    generate_default_config, load_config_or_default, save_config, validate_config, MasterConfig,
};
use density::api::{density_routes, DensityApiState};
use density::{DensityStore, LinearMockModel, SqliteDensityStore};
use observability::{init_logging, init_metrics, LogFormat};
use server::{
    validate_config_ports, validate_ports_available, HealthState, HttpServer, ServerConfig,
    ServerExt,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let mut config = match cli.command.config_path() {
        Some(path) => load_config_or_default(path)?,
        None => generate_default_config(),
    };
    cli.command.apply_overrides(&mut config);

    let format = cli
        .log_format
        .map(|f| f.as_str())
        .unwrap_or(config.logging.format.as_str());
    init_logging(
        &config.service.name,
        LogFormat::parse(format).unwrap_or_default(),
    )?;
    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Serve { .. } => {
            info!("Executing 'serve' command");
            serve_command(config).await
        }
        Commands::Ingest { .. } => {
            info!("Executing 'ingest' command");
            ingest_command(config).await
        }
        Commands::Visualize { .. } => {
            info!("Executing 'visualize' command");
            visualize_command(config).await
        }
        Commands::Validate { config: args } => {
            info!("Executing 'validate' command");
            validate_command(&args.config, &config)
        }
        Commands::Init { output, force } => {
            info!("Executing 'init' command");
            init_command(&output, force)
        }
    }
}

/// Log the validation report and refuse to continue on errors.
fn ensure_valid(config: &MasterConfig) -> Result<()> {
    let report = validate_config(config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot continue due to configuration errors");
    }
    Ok(())
}

async fn serve_command(config: MasterConfig) -> Result<()> {
    ensure_valid(&config)?;

    let store = SqliteDensityStore::connect(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;

    if !store.is_initialized().await? {
        warn!(
            path = %config.database.path,
            "Density table not found, serving an empty table until 'ncif ingest' runs"
        );
        store.ensure_schema().await?;
    }
    let rows = store.count().await?;
    info!(rows, "Density table ready");

    let server_config = ServerConfig::from_master(&config);
    validate_config_ports(&server_config)?;
    validate_ports_available(&server_config).await?;

    if let Some(port) = server_config.metrics_port {
        init_metrics(&server_config.host, port)?;
    }

    let state = DensityApiState::new(Arc::new(store), Arc::new(LinearMockModel::default()));
    let health = HealthState::new(&config.service.name, &config.service.version);

    info!(
        host = %server_config.host,
        port = server_config.http_port,
        "Starting density API"
    );
    HttpServer::with_health(server_config, density_routes(Arc::new(state)), health)
        .run_with_ctrl_c()
        .await?;

    Ok(())
}

async fn ingest_command(config: MasterConfig) -> Result<()> {
    ensure_valid(&config)?;

    let store = SqliteDensityStore::connect(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;

    let summary = ingest::run_ingestion(&config.ingest, &store)
        .await
        .with_context(|| format!("Ingestion of {} failed", config.ingest.workbook))?;

    println!("[ok] Density table rebuilt from {}", config.ingest.workbook);
    println!();
    println!("{}", summary);
    Ok(())
}

async fn visualize_command(config: MasterConfig) -> Result<()> {
    ensure_valid(&config)?;

    let report = visualize::run_visualization(&config.visualization)
        .await
        .with_context(|| format!("Visualization against {} failed", config.visualization.base_url))?;

    println!("[ok] Charts rendered into {}", config.visualization.output_dir);
    println!();
    println!("{}", report);
    Ok(())
}

fn validate_command(path: &Path, config: &MasterConfig) -> Result<()> {
    info!(?path, "Validating configuration");

    let report = validate_config(config);

    println!("\n=== Configuration Validation Report ===\n");

    if !path.exists() {
        println!("  [info] {:?} not found, built-in defaults checked", path);
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service:  {} {}", config.service.name, config.service.version);
    println!("Database: {}", config.database.path);
    println!("Listen:   {}:{}", config.server.host, config.server.port);
    println!("Workbook: {}", config.ingest.workbook);
    println!("Charts:   {}", config.visualization.output_dir);

    Ok(())
}

fn init_command(output_path: &Path, force: bool) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    if output_path.exists() && !force {
        anyhow::bail!(
            "{:?} already exists; pass --force to overwrite it",
            output_path
        );
    }

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point ingest.workbook at the source spreadsheet");
    println!("  2. Run 'ncif ingest --config {:?}' to build the density table", output_path);
    println!("  3. Run 'ncif serve --config {:?}' to start the API", output_path);
    println!("  4. Run 'ncif visualize --config {:?}' to render charts", output_path);

    Ok(())
}
