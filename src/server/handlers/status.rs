//! Cache status as JSON.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::super::state::AppState;

/// Response from the status endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// An image has been generated since startup
    pub cached: bool,
    /// The cached image is younger than the TTL
    pub fresh: bool,
    /// RFC 3339 generation time of the cached image
    pub generated_at: Option<String>,
    pub age_secs: Option<i64>,
    pub ttl_secs: i64,
    pub width: u32,
    pub height: u32,
    pub source: String,
}

/// GET /status - cache age and pipeline settings.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.cache.snapshot().await;
    let display = state.pipeline.display();

    Json(StatusResponse {
        cached: snapshot.generated_at.is_some(),
        fresh: snapshot.fresh,
        generated_at: snapshot.generated_at.map(|t| t.to_rfc3339()),
        age_secs: snapshot.age.map(|age| age.num_seconds()),
        ttl_secs: state.cache.ttl().num_seconds(),
        width: display.width,
        height: display.height,
        source: state.pipeline.mode().to_string(),
    })
}
