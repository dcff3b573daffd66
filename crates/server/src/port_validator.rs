//! Port checks run before `serve` binds.
//!
//! A free port can be taken between the check and the real bind; the bind
//! itself remains authoritative.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Reject port 0 and warn on privileged ports.
pub fn validate_port_range(port: u16) -> Result<()> {
    if port == 0 {
        return Err(ServerError::InvalidConfig(
            "Port cannot be 0 (ephemeral port assignment not supported for explicit binding)"
                .to_string(),
        ));
    }
    if port < 1024 {
        warn!("Port {} is a privileged port (requires root/admin privileges)", port);
    }
    Ok(())
}

/// Range-check every configured port and make sure no two share a number.
pub fn validate_config_ports(config: &ServerConfig) -> Result<()> {
    let ports = config.ports();
    for (_, port) in &ports {
        validate_port_range(*port)?;
    }
    if let Some(metrics) = config.metrics_port {
        if metrics == config.http_port {
            return Err(ServerError::InvalidConfig(format!(
                "HTTP and metrics listeners both use port {}",
                metrics
            )));
        }
    }
    Ok(())
}

/// Check that every configured port can currently be bound.
pub async fn validate_ports_available(config: &ServerConfig) -> Result<()> {
    for (label, port) in config.ports() {
        let addr = format!("{}:{}", config.host, port);
        debug!("Checking {} port {}", label, port);

        match TcpListener::bind(&addr).await {
            Ok(listener) => drop(listener),
            Err(e) => {
                error!("{} port {} is not available: {}", label, port, e);
                return Err(ServerError::PortUnavailable {
                    label,
                    port,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!("Server ports validated");
    Ok(())
}

pub async fn is_port_in_use(host: &str, port: u16) -> bool {
    TcpListener::bind(format!("{}:{}", host, port)).await.is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_port_range() {
        assert!(validate_port_range(0).is_err());
        assert!(validate_port_range(80).is_ok());
        assert!(validate_port_range(8000).is_ok());
        assert!(validate_port_range(65535).is_ok());
    }

    #[test]
    fn test_shared_port_rejected() {
        let config = ServerConfig::new("127.0.0.1", 8000).with_metrics_port(8000);
        assert!(matches!(
            validate_config_ports(&config),
            Err(ServerError::InvalidConfig(_))
        ));
        let config = ServerConfig::new("127.0.0.1", 8000).with_metrics_port(9000);
        assert!(validate_config_ports(&config).is_ok());
    }

    #[tokio::test]
    async fn test_busy_port_detected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(is_port_in_use("127.0.0.1", port).await);
        let result = validate_ports_available(&ServerConfig::new("127.0.0.1", port)).await;
        assert!(matches!(result, Err(ServerError::PortUnavailable { label: "HTTP", port: p, .. }) if p == port));

        drop(listener);
        assert!(!is_port_in_use("127.0.0.1", port).await);
    }
}
