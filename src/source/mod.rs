//! # Image Sources
//!
//! Where pictures come from and how a single download URL is picked.
//!
//! ## Modules
//!
//! - [`catalog`]: HTTP client for the cat-picture catalog (metadata + download)
//! - [`prompt`]: URL builder for the generative sketch provider
//! - [`resolver`]: retry/fallback policy that turns a mode into one URL
//!
//! ## Source Modes
//!
//! | Mode | Metadata query | Filter | Fallback |
//! |------|----------------|--------|----------|
//! | `catalog` | yes | preferred tags, bounded attempts | one unfiltered query |
//! | `prompt` | no | random sketch prompt + seed | none needed |

pub mod catalog;
pub mod prompt;
pub mod resolver;

use async_trait::async_trait;
use bytes::Bytes;
use std::{fmt, str::FromStr};

use crate::error::{LookupError, PipelineError};

pub use catalog::{HttpProvider, ProviderConfig};
pub use prompt::PromptSource;
pub use resolver::{RetryPolicy, SourceResolver};

/// Which kind of upstream content to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Random photos from the catalog, filtered by tag
    #[default]
    Catalog,
    /// Generated ink sketches from a text prompt
    Prompt,
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "catalog" | "cataas" | "photo" => Ok(SourceMode::Catalog),
            "prompt" | "sketch" | "ai" => Ok(SourceMode::Prompt),
            other => Err(format!(
                "unknown source mode '{}' (expected catalog or prompt)",
                other
            )),
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Catalog => f.write_str("catalog"),
            SourceMode::Prompt => f.write_str("prompt"),
        }
    }
}

/// One picture offered by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    /// Catalog identifier
    pub id: String,
    /// Where the image bytes can be downloaded
    pub url: String,
    /// Declared media type, if the catalog sent one
    pub media_type: Option<String>,
}

impl SourceCandidate {
    /// Whether the declared media type is an animated format.
    ///
    /// A missing media type is not treated as animated.
    pub fn is_animated(&self) -> bool {
        let Some(media_type) = &self.media_type else {
            return false;
        };
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        essence == "image/gif" || essence == "image/apng" || essence.starts_with("video/")
    }
}

/// The remote image provider.
///
/// [`HttpProvider`] talks to the real services; tests substitute scripted
/// implementations.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Ask the catalog for a random picture, optionally restricted to a tag.
    async fn lookup(&self, tag: Option<&str>) -> Result<SourceCandidate, LookupError>;

    /// Download raw image bytes.
    async fn download(&self, url: &str) -> Result<Bytes, PipelineError>;
}
