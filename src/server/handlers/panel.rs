//! The panel image endpoint.

use axum::{
    extract::State,
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::super::state::AppState;
use crate::error::PipelineError;

/// Reports whether the response came from cache, a new render, or a stale fallback.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// GET /cat-ink - current panel bitmap.
///
/// Serves the cached image while it is fresh; otherwise regenerates it,
/// falling back to the stale image if generation fails. Only when there is
/// nothing to fall back to does this answer with an error status.
///
/// A regeneration started here finishes and is cached even if the client
/// hangs up first.
pub async fn cat_ink(State(state): State<Arc<AppState>>) -> Response {
    let producer = Arc::clone(&state);
    let generate = || async move { producer.pipeline.produce_fresh().await };
    match state.cache.get_or_generate(generate).await {
        Ok(hit) => (
            [
                (header::CONTENT_TYPE, "image/bmp"),
                (header::CACHE_CONTROL, "no-store"),
                (X_CACHE, hit.served.as_str()),
            ],
            hit.bytes,
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

fn error_response(error: &PipelineError) -> Response {
    let status = if error.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    tracing::error!(%error, status = status.as_u16(), "no image to serve");
    (status, format!("Failed to generate image: {}", error)).into_response()
}
