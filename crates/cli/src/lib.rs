use clap::{Args, Parser, Subcommand, ValueEnum};
use config::MasterConfig;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "ncif.yaml";

#[derive(Parser, Debug)]
#[command(name = "ncif")]
#[command(about = "NCIF data integration - branch density and air quality by census tract")]
#[command(version)]
pub struct Cli {
    /// Override the configured log format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the density API
    Serve {
        #[command(flatten)]
        config: ConfigArgs,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the HTTP port
        #[arg(long)]
        port: Option<u16>,

        /// Override the SQLite database path
        #[arg(long)]
        database: Option<String>,
    },

    /// Load the workbook and rebuild the density table
    Ingest {
        #[command(flatten)]
        config: ConfigArgs,

        /// Override the workbook path
        #[arg(long)]
        workbook: Option<String>,

        /// Override the SQLite database path
        #[arg(long)]
        database: Option<String>,
    },

    /// Fetch from a running API and render the charts
    Visualize {
        #[command(flatten)]
        config: ConfigArgs,

        /// Override the API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Override the chart output directory
        #[arg(long)]
        output_dir: Option<String>,
    },

    /// Validate configuration without running anything
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the configuration file; built-in defaults apply when it is missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Commands {
    /// The `--config` path, for commands that read one.
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Commands::Serve { config, .. }
            | Commands::Ingest { config, .. }
            | Commands::Visualize { config, .. }
            | Commands::Validate { config } => Some(&config.config),
            Commands::Init { .. } => None,
        }
    }

    /// Write this command's override flags into `master`.
    pub fn apply_overrides(&self, master: &mut MasterConfig) {
        match self {
            Commands::Serve {
                host,
                port,
                database,
                ..
            } => {
                if let Some(host) = host {
                    master.server.host = host.clone();
                }
                if let Some(port) = port {
                    master.server.port = *port;
                }
                if let Some(database) = database {
                    master.database.path = database.clone();
                }
            }
            Commands::Ingest {
                workbook, database, ..
            } => {
                if let Some(workbook) = workbook {
                    master.ingest.workbook = workbook.clone();
                }
                if let Some(database) = database {
                    master.database.path = database.clone();
                }
            }
            Commands::Visualize {
                base_url,
                output_dir,
                ..
            } => {
                if let Some(base_url) = base_url {
                    master.visualization.base_url = base_url.clone();
                }
                if let Some(output_dir) = output_dir {
                    master.visualization.output_dir = output_dir.clone();
                }
            }
            Commands::Validate { .. } | Commands::Init { .. } => {}
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "ncif", "serve", "--port", "9100", "--database", "/tmp/d.db", "--log-format", "json",
        ]);
        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
        assert_eq!(cli.command.config_path(), Some(&PathBuf::from("ncif.yaml")));

        let mut master = MasterConfig::default();
        cli.command.apply_overrides(&mut master);
        assert_eq!(master.server.port, 9100);
        assert_eq!(master.server.host, "127.0.0.1");
        assert_eq!(master.database.path, "/tmp/d.db");
    }

    #[test]
    fn test_visualize_overrides() {
        let cli = Cli::parse_from([
            "ncif",
            "visualize",
            "-c",
            "other.yaml",
            "--base-url",
            "http://10.0.0.5:8000",
            "--output-dir",
            "out",
        ]);
        assert_eq!(cli.command.config_path(), Some(&PathBuf::from("other.yaml")));

        let mut master = MasterConfig::default();
        cli.command.apply_overrides(&mut master);
        assert_eq!(master.visualization.base_url, "http://10.0.0.5:8000");
        assert_eq!(master.visualization.output_dir, "out");
    }

    #[test]
    fn test_init_has_no_config() {
        let cli = Cli::parse_from(["ncif", "init", "--force"]);
        assert!(cli.command.config_path().is_none());
        assert!(matches!(cli.command, Commands::Init { force: true, .. }));
    }
}
