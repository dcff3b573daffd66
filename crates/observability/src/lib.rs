//! Observability infrastructure for the NCIF density service
//!
//! This crate provides:
//! - Structured logging via tracing
//! - Prometheus metrics for the HTTP API
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("ncif-api", LogFormat::Pretty)?;
//!
//! // Optional: expose /metrics on a side port
//! observability::metrics::init_metrics("127.0.0.1", 9000)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, record_rows_returned, RequestMetricsGuard, ServerMetrics};
