//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::aggregate::DataAggregator;
use crate::error::AggregateError;
use crate::metrics;

/// Body returned when the fetch-merge operation fails unexpectedly.
pub const FETCH_FAILED_MESSAGE: &str = "An error occurred while fetching data";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fetch-merge operation over both upstreams.
    pub aggregator: Arc<DataAggregator>,
}

impl AppState {
    /// Create new app state.
    pub fn new(aggregator: DataAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Fetch handler - 200 with the merged body, 400 when both upstreams failed.
pub async fn fetch_data(State(state): State<AppState>) -> Response {
    let response = match state.aggregator.fetch_data().await {
        Ok(merged) if merged.is_error() => {
            info!("Both upstream calls failed");
            (StatusCode::BAD_REQUEST, Json(merged)).into_response()
        }
        Ok(merged) => (StatusCode::OK, Json(merged)).into_response(),
        Err(e) => e.into_response(),
    };

    metrics::inc_fetch_data_requests(response.status().as_u16());
    response
}

impl IntoResponse for AggregateError {
    fn into_response(self) -> Response {
        error!(error = %self, "Fetch-merge failed");
        (StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE).into_response()
    }
}
