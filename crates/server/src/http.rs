//! The density API listener.

use async_trait::async_trait;
use axum::Router;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::health::{health_routes, HealthState};
use crate::traits::Server;

/// Serves an Axum router until its shutdown token is cancelled.
///
/// Clones share the bound address, so a clone kept before `spawn` can be
/// used to find the port when binding to port 0.
///
/// ```ignore
/// use server::{HealthState, HttpServer, ServerConfig, ServerExt};
///
/// let server = HttpServer::with_health(
///     ServerConfig::new("127.0.0.1", 8000),
///     density_routes(state),
///     HealthState::new("NCIF Data Integration API", "1.0.0"),
/// );
/// server.run_with_ctrl_c().await?;
/// ```
#[derive(Clone)]
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    /// `Some` exactly while serving
    listening_on: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    /// Serve `router` exactly as given.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router,
            listening_on: Arc::default(),
        }
    }

    /// Serve `router` plus `GET /health`, with request tracing.
    pub fn with_health(config: ServerConfig, router: Router, health: HealthState) -> Self {
        let router = router
            .merge(health_routes(health))
            .layer(TraceLayer::new_for_http());
        Self::new(config, router)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.http_addr()?;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                address: addr.to_string(),
                source,
            })
    }
}

#[async_trait]
impl Server for HttpServer {
    fn name(&self) -> &str {
        "density-api"
    }

    fn address(&self) -> Option<SocketAddr> {
        *self.listening_on.read()
    }

    fn is_running(&self) -> bool {
        self.listening_on.read().is_some()
    }

    async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;
        *self.listening_on.write() = Some(local_addr);
        info!(%local_addr, "Density API listening");

        let served = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("Draining in-flight requests");
            })
            .await;

        self.listening_on.write().take();

        served.map_err(|e| {
            error!(%e, "Density API stopped with an error");
            ServerError::Io(e)
        })?;
        info!("Density API stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ServerExt;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use std::time::Duration;
    use tower::ServiceExt as _;

    fn app() -> Router {
        Router::new().route("/", get(|| async { "density" }))
    }

    #[tokio::test]
    async fn test_with_health_keeps_app_routes() {
        let server = HttpServer::with_health(
            ServerConfig::new("127.0.0.1", 0),
            app(),
            HealthState::new("test", "0.0.0"),
        );

        for uri in ["/", "/health"] {
            let response = server
                .router()
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_binds_and_shuts_down() {
        let server = HttpServer::new(ServerConfig::new("127.0.0.1", 0), app());
        let probe = server.clone();
        assert_eq!(server.name(), "density-api");
        let (handle, token) = server.spawn();

        let mut bound = None;
        for _ in 0..50 {
            if let Some(addr) = probe.address() {
                bound = Some(addr);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let bound = bound.expect("server should bind");
        assert_ne!(bound.port(), 0);
        assert!(probe.is_running());

        token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok(), "Server should shutdown within timeout");
        assert!(!probe.is_running());
        assert!(probe.address().is_none());
    }
}
