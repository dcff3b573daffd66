//! HTTP request handlers for the density API.

use crate::api::models::*;
use crate::error::DensityError;
use crate::filter::DensityFilter;
use crate::keyword_query::parse_keyword_query;
use crate::prediction::PredictionModel;
use crate::store::DensityStore;
use crate::types::DensityRecord;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use observability::{record_rows_returned, RequestMetricsGuard, ServerMetrics};
use std::sync::Arc;
use tracing::{debug, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared state for density API handlers.
pub struct DensityApiState {
    pub store: Arc<dyn DensityStore>,
    pub model: Arc<dyn PredictionModel>,
    pub metrics: ServerMetrics,
}

impl DensityApiState {
    pub fn new(store: Arc<dyn DensityStore>, model: Arc<dyn PredictionModel>) -> Self {
        Self {
            store,
            model,
            metrics: ServerMetrics::new("density"),
        }
    }

    async fn fetch(&self, filter: &DensityFilter) -> Result<Vec<DensityRecord>, ApiError> {
        self.store
            .query(&filter.build_query())
            .await
            .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e))
    }
}

fn api_error(status: StatusCode, err: &DensityError) -> ApiError {
    if status.is_server_error() {
        warn!("Density request failed: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: err.to_string(),
        }),
    )
}

/// GET /
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::default())
}

/// GET /density
///
/// `census_tract` may repeat. Thresholds that do not parse are rejected
/// with 422.
pub async fn get_density(
    State(state): State<Arc<DensityApiState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<DensityRecord>>, ApiError> {
    let mut guard = RequestMetricsGuard::new(&state.metrics, "/density");

    let filter = DensityFilter::from_query_pairs(&pairs).map_err(|e| {
        guard.set_status(StatusCode::UNPROCESSABLE_ENTITY.as_u16());
        api_error(StatusCode::UNPROCESSABLE_ENTITY, &e)
    })?;

    let records = state.fetch(&filter).await.map_err(|e| {
        guard.set_status(e.0.as_u16());
        e
    })?;

    debug!(?filter, rows = records.len(), "Density query answered");
    record_rows_returned("/density", records.len());
    Ok(Json(records))
}

/// POST /predict
pub async fn predict_pm25(
    State(state): State<Arc<DensityApiState>>,
    Json(request): Json<PredictionRequest>,
) -> Json<PredictionResponse> {
    let _guard = RequestMetricsGuard::new(&state.metrics, "/predict");

    Json(PredictionResponse {
        branch_count: request.branch_count,
        predicted_pm25: state.model.predict(request.branch_count),
    })
}

/// POST /query-nlp
///
/// Unsupported or malformed query text is answered in-band with
/// `{"error": ..}`; only storage failures produce an error status.
pub async fn query_keywords(
    State(state): State<Arc<DensityApiState>>,
    Json(request): Json<KeywordQueryRequest>,
) -> Result<Json<KeywordQueryResponse>, ApiError> {
    let mut guard = RequestMetricsGuard::new(&state.metrics, "/query-nlp");

    let thresholds = match parse_keyword_query(&request.nlp_query) {
        Ok(thresholds) => thresholds,
        Err(e) => {
            debug!(query = %request.nlp_query, "Keyword query rejected: {}", e);
            return Ok(Json(KeywordQueryResponse::Error(QueryErrorBody {
                error: e.response_message(),
            })));
        }
    };

    let records = state.fetch(&thresholds.into_filter()).await.map_err(|e| {
        guard.set_status(e.0.as_u16());
        e
    })?;

    record_rows_returned("/query-nlp", records.len());
    Ok(Json(KeywordQueryResponse::Records(records)))
}
