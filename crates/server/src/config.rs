//! Server configuration
//!
//! Bind settings for the API listener and the optional metrics exporter.

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Default port assignments.
pub mod ports {
    /// Density API HTTP port
    pub const API_HTTP: u16 = 8000;
    /// Prometheus exporter port, when metrics are enabled
    pub const METRICS: u16 = 9000;
}

/// Where the service listens.
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8000).with_metrics_port(9000);
/// assert_eq!(config.ports(), vec![("HTTP", 8000), ("metrics", 9000)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    pub http_port: u16,
    /// Prometheus exporter port; `None` disables the exporter
    pub metrics_port: Option<u16>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, http_port: u16) -> Self {
        Self {
            host: host.into(),
            http_port,
            metrics_port: None,
        }
    }

    pub fn with_metrics_port(mut self, port: u16) -> Self {
        self.metrics_port = Some(port);
        self
    }

    /// Build from the `server` and `monitoring` sections of the master config.
    pub fn from_master(master: &::config::MasterConfig) -> Self {
        Self {
            host: master.server.host.clone(),
            http_port: master.server.port,
            metrics_port: master.monitoring.metrics_port,
        }
    }

    /// Every port this configuration binds, labelled for log output.
    pub fn ports(&self) -> Vec<(&'static str, u16)> {
        let mut ports = vec![("HTTP", self.http_port)];
        if let Some(port) = self.metrics_port {
            ports.push(("metrics", port));
        }
        ports
    }

    /// HTTP socket address
    pub fn http_addr(&self) -> Result<SocketAddr> {
        self.parse_addr(self.http_port)
    }

    fn parse_addr(&self, port: u16) -> Result<SocketAddr> {
        format!("{}:{}", self.host, port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", ports::API_HTTP)
    }
}
