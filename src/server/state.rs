//! Server state and configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    cache::{Clock, ImageCache, SystemClock},
    error::CatInkError,
    pipeline::{Pipeline, PipelineConfig},
    source::{HttpProvider, ImageProvider},
};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:5000")
    pub listen_addr: String,
    /// How long a generated image is served before regenerating
    pub cache_ttl: Duration,
    /// Image pipeline settings
    pub pipeline: PipelineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            cache_ttl: Duration::from_secs(180),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: Pipeline,
    /// The one process-wide image slot
    pub cache: ImageCache,
}

impl AppState {
    /// State backed by the real upstream services and the wall clock.
    pub fn new(config: ServerConfig) -> Result<Self, CatInkError> {
        let provider = HttpProvider::new(config.pipeline.provider.clone())?;
        Self::with_parts(config, Arc::new(provider), Arc::new(SystemClock))
    }

    /// State with an explicit provider and clock.
    pub fn with_parts(
        config: ServerConfig,
        provider: Arc<dyn ImageProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CatInkError> {
        let pipeline = Pipeline::new(&config.pipeline, provider);
        let cache = ImageCache::new(config.cache_ttl, clock)?;
        Ok(Self {
            config,
            pipeline,
            cache,
        })
    }
}
