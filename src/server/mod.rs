//! # HTTP Server for E-Paper Frames
//!
//! Serves the current panel image over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! cat-ink serve --port 5000 --cache-ttl 180
//! ```
//!
//! Then point the frame at `http://<host>:5000/cat-ink`.
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | plain-text status line |
//! | `GET /cat-ink` | `image/bmp`, 502/500 plain text on failure |
//! | `GET /status` | JSON cache state |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::CatInkError;

/// Build the router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/cat-ink", get(handlers::panel::cat_ink))
        .route("/status", get(handlers::status::status))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use cat_ink::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), cat_ink::error::CatInkError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:5000".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CatInkError> {
    let app_state = Arc::new(AppState::new(config.clone())?);
    let app = router(app_state);

    tracing::info!(
        listen_addr = %config.listen_addr,
        width = config.pipeline.display.width,
        height = config.pipeline.display.height,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        source = %config.pipeline.mode,
        dither = %config.pipeline.dither,
        "cat-ink server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            CatInkError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| CatInkError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
