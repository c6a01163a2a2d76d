//! Candidate selection with bounded retry and an unfiltered fallback.
//!
//! ```text
//! catalog mode
//!
//!   attempt 1..=N  lookup(random preferred tag)
//!                    ├─ error / non-200 ───────► next attempt (no delay)
//!                    ├─ animated media type ───► next attempt
//!                    └─ still image ───────────► URL
//!   fallback       lookup(no tag), exactly once
//!                    ├─ still image ───────────► URL
//!                    └─ anything else ─────────► None
//! ```
//!
//! Prompt mode never queries metadata; it builds a URL directly.

use rand::seq::IndexedRandom;
use std::sync::Arc;

use super::{ImageProvider, PromptSource, SourceCandidate, SourceMode};

/// How hard the catalog is tried before falling back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Lookups against the preferred tags before the unfiltered fallback
    pub attempts: u32,
    /// Tags considered high-contrast enough for the panel; one is picked per attempt
    pub preferred_tags: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            preferred_tags: vec!["black".to_string(), "white".to_string()],
        }
    }
}

/// Turns a [`SourceMode`] into at most one download URL.
pub struct SourceResolver {
    mode: SourceMode,
    provider: Arc<dyn ImageProvider>,
    policy: RetryPolicy,
    prompts: PromptSource,
}

impl SourceResolver {
    pub fn new(
        mode: SourceMode,
        provider: Arc<dyn ImageProvider>,
        policy: RetryPolicy,
        prompts: PromptSource,
    ) -> Self {
        Self {
            mode,
            provider,
            policy,
            prompts,
        }
    }

    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    /// Pick a download URL, or `None` when every attempt failed.
    pub async fn resolve(&self) -> Option<String> {
        match self.mode {
            SourceMode::Catalog => self.resolve_catalog().await,
            SourceMode::Prompt => self.prompts.random_url(),
        }
    }

    async fn resolve_catalog(&self) -> Option<String> {
        for attempt in 1..=self.policy.attempts {
            let tag = self.pick_tag();
            if let Some(candidate) = self.try_lookup(tag.as_deref(), attempt).await {
                return Some(candidate.url);
            }
        }

        tracing::info!(
            attempts = self.policy.attempts,
            "preferred tags exhausted, trying unfiltered catalog"
        );
        self.try_lookup(None, 0).await.map(|candidate| candidate.url)
    }

    /// One lookup; `None` for failures and animated candidates.
    async fn try_lookup(&self, tag: Option<&str>, attempt: u32) -> Option<SourceCandidate> {
        match self.provider.lookup(tag).await {
            Ok(candidate) if candidate.is_animated() => {
                tracing::debug!(
                    attempt,
                    tag,
                    id = %candidate.id,
                    media_type = candidate.media_type.as_deref(),
                    "skipping animated candidate"
                );
                None
            }
            Ok(candidate) => {
                tracing::debug!(attempt, tag, id = %candidate.id, "candidate accepted");
                Some(candidate)
            }
            Err(e) => {
                tracing::warn!(attempt, tag, error = %e, "catalog lookup failed");
                None
            }
        }
    }

    fn pick_tag(&self) -> Option<String> {
        self.policy
            .preferred_tags
            .choose(&mut rand::rng())
            .cloned()
    }
}
