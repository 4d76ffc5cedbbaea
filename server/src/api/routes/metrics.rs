//! Prometheus scrape endpoint

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus_client::registry::Registry;

use crate::api::StatsExposition;
use crate::api::types::ApiError;
use crate::core::constants::METRICS_CONTENT_TYPE;

#[derive(Clone)]
pub struct MetricsState {
    pub registry: Arc<Registry>,
}

pub fn routes(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/metrics", get(scrape))
        .with_state(MetricsState { registry })
}

/// Render every registered collector in the text exposition format
pub async fn scrape(State(state): State<MetricsState>) -> Result<Response, ApiError> {
    let body = StatsExposition::render(&state.registry).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode metrics");
        ApiError::internal("Failed to encode metrics")
    })?;

    Ok(([(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)], body).into_response())
}
