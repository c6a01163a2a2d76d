//! HTTP handlers for the server.

pub mod panel;
pub mod status;

/// GET / - plain-text liveness line.
pub async fn index() -> &'static str {
    "Cat Ink Server Running. Go to /cat-ink"
}
