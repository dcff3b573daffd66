//! Prometheus metrics
//!
//! Without an installed exporter every recording below is a no-op, so the
//! API can record unconditionally.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Start the Prometheus exporter, serving `/metrics` on `host:port`.
pub fn init_metrics(host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Request metrics for one API surface.
///
/// * `api_requests_total{api, route, status}`
/// * `api_request_duration_seconds{api, route}`
#[derive(Debug, Clone)]
pub struct ServerMetrics {
    api_name: String,
}

impl ServerMetrics {
    pub fn new(api_name: &str) -> Self {
        Self {
            api_name: api_name.to_string(),
        }
    }

    pub fn record_request(&self, route: &'static str, duration: Duration, status_code: u16) {
        counter!(
            "api_requests_total",
            "api" => self.api_name.clone(),
            "route" => route,
            "status" => status_code.to_string()
        )
        .increment(1);
        histogram!(
            "api_request_duration_seconds",
            "api" => self.api_name.clone(),
            "route" => route
        )
        .record(duration.as_secs_f64());
    }

    pub fn api_name(&self) -> &str {
        &self.api_name
    }
}

/// Number of density records a route answered with.
pub fn record_rows_returned(route: &'static str, rows: usize) {
    histogram!("density_rows_returned", "route" => route).record(rows as f64);
}

/// Records duration and status for one request when dropped.
///
/// ```ignore
/// let mut guard = RequestMetricsGuard::new(&state.metrics, "/density");
/// // ... on failure:
/// guard.set_status(500);
/// ```
pub struct RequestMetricsGuard<'a> {
    metrics: &'a ServerMetrics,
    route: &'static str,
    start: Instant,
    status_code: u16,
}

impl<'a> RequestMetricsGuard<'a> {
    pub fn new(metrics: &'a ServerMetrics, route: &'static str) -> Self {
        Self {
            metrics,
            route,
            start: Instant::now(),
            status_code: 200,
        }
    }

    pub fn set_status(&mut self, code: u16) {
        self.status_code = code;
    }
}

impl Drop for RequestMetricsGuard<'_> {
    fn drop(&mut self) {
        self.metrics
            .record_request(self.route, self.start.elapsed(), self.status_code);
    }
}
