//! HTTP server infrastructure for the NCIF density service
//!
//! Lifecycle management for the API listener: bind, serve, and drain on
//! shutdown.
//!
//! # Architecture
//!
//! [`HttpServer`] implements the [`Server`] trait; [`ServerExt`] adds
//! `spawn()` and `run_with_ctrl_c()`. Shutdown is coordinated with a
//! `CancellationToken` from `tokio_util`.
//!
//! ```ignore
//! use server::{HealthState, HttpServer, ServerConfig, ServerExt};
//!
//! let config = ServerConfig::from_master(&master);
//! server::port_validator::validate_config_ports(&config)?;
//! HttpServer::with_health(config, router, HealthState::new("ncif", "1.0.0"))
//!     .run_with_ctrl_c()
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use crate::config::{ports, ServerConfig};
pub use error::{Result, ServerError};
pub use health::{HealthState, HealthStatus};
pub use http::HttpServer;
pub use port_validator::{validate_config_ports, validate_ports_available};
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
