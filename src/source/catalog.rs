//! HTTP access to the image providers.
//!
//! The catalog answers `GET {base}/cat/{tag}?json=true` (or `/cat?json=true`
//! for any picture) with a small JSON document:
//!
//! ```json
//! { "id": "595f280b557291a9750ebf65", "mimetype": "image/jpeg", "tags": ["black"] }
//! ```
//!
//! Older deployments name the identifier `_id`. Both spellings are accepted
//! and normalized by [`CatalogMetadata::identifier`]. Image bytes live at
//! `{base}/cat/{id}`, optionally with a `width` hint.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use super::{ImageProvider, SourceCandidate};
use crate::error::{CatInkError, LookupError, PipelineError};

/// Endpoints and timeouts for the upstream services.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the cat catalog
    pub catalog_url: String,
    /// Base URL of the generative sketch provider
    pub prompt_url: String,
    /// Width requested from the catalog when downloading, if any
    pub width_hint: Option<u32>,
    /// Timeout for one metadata query
    pub metadata_timeout: Duration,
    /// Timeout for one image download
    pub download_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            catalog_url: "https://cataas.com".to_string(),
            prompt_url: "https://image.pollinations.ai".to_string(),
            width_hint: None,
            metadata_timeout: Duration::from_secs(5),
            download_timeout: Duration::from_secs(30),
        }
    }
}

/// Metadata document returned by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMetadata {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

impl CatalogMetadata {
    /// The picture's identifier: `id` when present, otherwise `_id`.
    pub fn identifier(&self) -> Option<&str> {
        [self.id.as_deref(), self.legacy_id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
    }
}

/// [`ImageProvider`] backed by `reqwest`.
pub struct HttpProvider {
    client: Client,
    catalog_base: Url,
    config: ProviderConfig,
}

impl HttpProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: ProviderConfig) -> Result<Self, CatInkError> {
        let client = Client::builder()
            .user_agent(concat!("cat-ink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatInkError::Transport(format!("HTTP client error: {}", e)))?;
        Self::with_client(client, config)
    }

    /// Create a provider sharing an existing HTTP client.
    pub fn with_client(client: Client, config: ProviderConfig) -> Result<Self, CatInkError> {
        let catalog_base = Url::parse(&config.catalog_url).map_err(|e| {
            CatInkError::Config(format!("Invalid catalog URL '{}': {}", config.catalog_url, e))
        })?;
        if catalog_base.cannot_be_a_base() {
            return Err(CatInkError::Config(format!(
                "Catalog URL '{}' cannot be used as a base",
                config.catalog_url
            )));
        }
        Ok(Self {
            client,
            catalog_base,
            config,
        })
    }

    /// `{base}/cat[/{tag}]?json=true`
    pub fn metadata_url(&self, tag: Option<&str>) -> Result<Url, LookupError> {
        let mut segments = vec!["cat"];
        segments.extend(tag);
        let mut url = self.catalog_path(&segments)?;
        url.query_pairs_mut().append_pair("json", "true");
        Ok(url)
    }

    /// `{base}/cat/{id}[?width=N]`
    pub fn image_url(&self, id: &str) -> Result<Url, LookupError> {
        let mut url = self.catalog_path(&["cat", id])?;
        if let Some(width) = self.config.width_hint {
            url.query_pairs_mut().append_pair("width", &width.to_string());
        }
        Ok(url)
    }

    fn catalog_path(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let mut url = self.catalog_base.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::Url(self.config.catalog_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ImageProvider for HttpProvider {
    async fn lookup(&self, tag: Option<&str>) -> Result<SourceCandidate, LookupError> {
        let url = self.metadata_url(tag)?;
        tracing::debug!(%url, "querying catalog");

        let response = self
            .client
            .get(url)
            .timeout(self.config.metadata_timeout)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let metadata: CatalogMetadata =
            serde_json::from_slice(&body).map_err(|e| LookupError::Metadata(e.to_string()))?;
        let id = metadata
            .identifier()
            .ok_or_else(|| LookupError::Metadata("missing identifier".to_string()))?;

        Ok(SourceCandidate {
            id: id.to_string(),
            url: self.image_url(id)?.to_string(),
            media_type: metadata.mimetype.clone(),
        })
    }

    async fn download(&self, url: &str) -> Result<Bytes, PipelineError> {
        let response = self
            .client
            .get(url)
            .timeout(self.config.download_timeout)
            .send()
            .await
            .map_err(|e| PipelineError::DownloadFailed(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(PipelineError::DownloadFailed(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        response
            .bytes()
            .await
            .map_err(|e| PipelineError::DownloadFailed(format!("Failed to read image data: {}", e)))
    }
}
