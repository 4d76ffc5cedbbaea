//! Known sources listing

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::types::ListResponse;
use crate::domain::StatsCollector;
use crate::domain::stats::SourceSummary;

#[derive(Clone)]
pub struct SourcesState {
    pub collector: Arc<StatsCollector>,
}

pub fn routes(collector: Arc<StatsCollector>) -> Router {
    Router::new()
        .route("/", get(list))
        .with_state(SourcesState { collector })
}

/// List every source with a snapshot, ordered by source id
pub async fn list(State(state): State<SourcesState>) -> Json<ListResponse<SourceSummary>> {
    Json(ListResponse {
        data: state.collector.sources(),
    })
}
