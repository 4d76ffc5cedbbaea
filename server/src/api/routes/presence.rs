//! Presence ingestion endpoint
//!
//! Accepts the stats extension of a brewery MUC presence, relayed as JSON,
//! and replaces the sender's snapshot.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::types::ApiError;
use crate::domain::StatsCollector;
use crate::domain::stats::{RawStat, SourceId};

#[derive(Clone)]
pub struct PresenceState {
    pub collector: Arc<StatsCollector>,
    /// Log every accepted presence at info level
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
pub struct PresenceRequest {
    /// Full MUC JID of the sender (`room@service/nick`)
    pub from: String,
    #[serde(default)]
    pub stats: Vec<RawStat>,
}

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub source: SourceId,
    pub stats: usize,
}

pub fn routes(collector: Arc<StatsCollector>, debug: bool) -> Router {
    Router::new()
        .route("/", post(ingest))
        .with_state(PresenceState { collector, debug })
}

pub async fn ingest(
    State(state): State<PresenceState>,
    Json(request): Json<PresenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(source) = SourceId::from_muc_jid(&request.from) else {
        tracing::debug!(from = %request.from, "Rejecting presence without resource part");
        return Err(ApiError::bad_request(
            "INVALID_JID",
            format!("Sender JID has no resource part: {}", request.from),
        ));
    };

    if state.debug {
        tracing::info!(from = %request.from, stats = ?request.stats, "Received presence");
    }

    let count = request.stats.len();
    state.collector.push(source.clone(), request.stats);

    Ok((
        StatusCode::ACCEPTED,
        Json(PresenceResponse {
            source,
            stats: count,
        }),
    ))
}
