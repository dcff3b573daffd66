//! Axum route definitions for the density API.

use crate::api::handlers::{self, DensityApiState};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Create all density routes.
///
/// # Routes
///
/// - `GET /` - Welcome message
/// - `GET /density` - Records filtered by tract, PM2.5 and branch count
/// - `POST /predict` - Mock PM2.5 prediction from a branch count
/// - `POST /query-nlp` - Keyword query over the same filters
pub fn density_routes(state: Arc<DensityApiState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/density", get(handlers::get_density))
        .route("/predict", post(handlers::predict_pm25))
        .route("/query-nlp", post(handlers::query_keywords))
        .with_state(state)
}
