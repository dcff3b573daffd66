//! HTTP API for density records.
//!
//! ## Modules
//!
//! - `handlers` - Request handlers and shared state
//! - `routes` - Axum router
//! - `models` - Request/response types

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::DensityApiState;
pub use routes::density_routes;
