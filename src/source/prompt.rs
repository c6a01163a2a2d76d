//! Generative sketch URLs.
//!
//! The generative provider renders an image straight from its URL, so no
//! metadata round-trip is needed: pick a prompt, pick a seed, build the URL.
//!
//! ```text
//! {base}/prompt/{url-encoded prompt}?width=1024&height=1024&seed=48213&nologo=true&model=flux
//! ```
//!
//! A fresh random seed on every call makes the provider return a new picture
//! even for a prompt it has seen before. Requesting 1024×1024 keeps lines
//! crisp after downscaling to the panel.

use rand::{Rng, seq::IndexedRandom};
use reqwest::Url;

use crate::error::LookupError;

/// Ink-sketch prompts tuned for a black/white/red panel.
pub const DEFAULT_PROMPTS: &[&str] = &[
    "minimalist continuous line drawing of a cat, black ink on white background, red collar",
    "vector sketch of a cute cat face, simple lines, white background, small red heart",
    "stippling art style drawing of a cat sleeping, high contrast, white background, red ball of yarn",
    "pen and ink sketch of a cat sitting on a fence, white background, red bowtie",
    "japanese ink wash painting of a cat, minimal, white background, red sun in background",
];

/// Largest seed sent to the provider.
pub const MAX_SEED: u32 = 100_000;

/// Builds generative image URLs from a prompt list.
#[derive(Debug, Clone)]
pub struct PromptSource {
    base_url: String,
    prompts: Vec<String>,
    /// Square edge length requested from the provider
    pub size: u32,
    /// Provider-side model name
    pub model: String,
}

impl PromptSource {
    pub fn new(base_url: impl Into<String>, prompts: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            prompts,
            size: 1024,
            model: "flux".to_string(),
        }
    }

    /// A source using [`DEFAULT_PROMPTS`].
    pub fn with_default_prompts(base_url: impl Into<String>) -> Self {
        Self::new(
            base_url,
            DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(),
        )
    }

    /// Build the URL for one prompt and seed.
    pub fn url_for(&self, prompt: &str, seed: u32) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LookupError::Url(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .push("prompt")
            .push(prompt);
        url.query_pairs_mut()
            .append_pair("width", &self.size.to_string())
            .append_pair("height", &self.size.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("nologo", "true")
            .append_pair("model", &self.model);
        Ok(url)
    }

    /// Pick a random prompt and seed and build its URL.
    ///
    /// `None` when no prompts are configured or the base URL is unusable.
    pub fn random_url(&self) -> Option<String> {
        let (prompt, seed) = {
            let mut rng = rand::rng();
            let prompt = self.prompts.choose(&mut rng)?;
            (prompt, rng.random_range(0..=MAX_SEED))
        };

        match self.url_for(prompt, seed) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "could not build prompt URL");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_for_encodes_prompt() {
        let source = PromptSource::with_default_prompts("https://sketch.test");
        let url = source.url_for("pen and ink cat", 42).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sketch.test/prompt/pen%20and%20ink%20cat?width=1024&height=1024&seed=42&nologo=true&model=flux"
        );
    }

    #[test]
    fn test_random_url_uses_configured_prompts() {
        let source = PromptSource::new("https://sketch.test/", vec!["only cat".to_string()]);
        for _ in 0..20 {
            let url = Url::parse(&source.random_url().unwrap()).unwrap();
            assert_eq!(url.path(), "/prompt/only%20cat");

            let seed: u32 = url
                .query_pairs()
                .find(|(k, _)| k == "seed")
                .map(|(_, v)| v.parse().unwrap())
                .unwrap();
            assert!(seed <= MAX_SEED);
        }
    }

    #[test]
    fn test_no_prompts_no_url() {
        let source = PromptSource::new("https://sketch.test", Vec::new());
        assert_eq!(source.random_url(), None);
    }

    #[test]
    fn test_bad_base_url() {
        let source = PromptSource::with_default_prompts("::nope::");
        assert!(source.url_for("cat", 1).is_err());
        assert_eq!(source.random_url(), None);
    }
}
