//! # Error Types
//!
//! This module defines error types used throughout the cat-ink library.
//!
//! - [`PipelineError`]: why a fresh image could not be produced
//! - [`LookupError`]: why a single catalog metadata attempt failed
//! - [`CatInkError`]: top-level errors for the binary and server startup

use thiserror::Error;

/// Failure of one "produce fresh image" run.
///
/// `Clone` so the cache can hand the same failure to every request that
/// waited on the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The resolver exhausted its attempts without a usable candidate
    #[error("No candidate image found")]
    NoCandidateFound,

    /// Transport error or non-success status while downloading image bytes
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// Downloaded bytes are not a decodable image
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    /// Anything else that went wrong while normalizing, dithering or encoding
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

impl PipelineError {
    /// Whether the failure is attributable to the upstream image provider.
    ///
    /// The HTTP layer answers these with `502 Bad Gateway` and everything
    /// else with `500 Internal Server Error`.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PipelineError::NoCandidateFound
                | PipelineError::DownloadFailed(_)
                | PipelineError::DecodeFailed(_)
        )
    }
}

/// Failure of a single metadata query against the image catalog.
///
/// Never escapes the resolver: each one only costs an attempt.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    #[error("Invalid metadata: {0}")]
    Metadata(String),

    #[error("Invalid URL: {0}")]
    Url(String),
}

/// Main error type for cat-ink operations
#[derive(Debug, Error)]
pub enum CatInkError {
    /// Image pipeline failure
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level errors (bind, serve, HTTP client setup)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
