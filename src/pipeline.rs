//! # Image Pipeline
//!
//! One "produce a fresh bitmap" run:
//!
//! ```text
//! SourceResolver ──► download ──► decode ──► crop_to_fill ──► dither ──► BMP
//!   no URL              HTTP error   bad bytes     (everything after download is
//!   │                   │            │              CPU-bound and runs on the
//!   ▼                   ▼            ▼              blocking pool)
//! NoCandidateFound  DownloadFailed  DecodeFailed   ProcessingFailed
//! ```
//!
//! Every failure, including a panic in the CPU-bound stage, comes back as a
//! [`PipelineError`]; nothing is retried here.

use bytes::Bytes;
use image::imageops::FilterType;
use std::sync::Arc;

use crate::{
    display::DisplayConfig,
    error::PipelineError,
    render::{self, dither::DitheringAlgorithm, resize},
    source::{ImageProvider, PromptSource, ProviderConfig, RetryPolicy, SourceMode, SourceResolver},
};

/// Everything needed to build a [`Pipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Output geometry
    pub display: DisplayConfig,
    /// Quantization method
    pub dither: DitheringAlgorithm,
    /// Where pictures come from
    pub mode: SourceMode,
    /// Catalog retry/fallback policy
    pub retry: RetryPolicy,
    /// Prompts for [`SourceMode::Prompt`]; empty means the built-in list
    pub prompts: Vec<String>,
    /// Upstream endpoints and timeouts
    pub provider: ProviderConfig,
}

/// Resolver → download → normalize → quantize.
pub struct Pipeline {
    resolver: SourceResolver,
    provider: Arc<dyn ImageProvider>,
    display: DisplayConfig,
    dither: DitheringAlgorithm,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig, provider: Arc<dyn ImageProvider>) -> Self {
        let prompts = if config.prompts.is_empty() {
            PromptSource::with_default_prompts(config.provider.prompt_url.clone())
        } else {
            PromptSource::new(config.provider.prompt_url.clone(), config.prompts.clone())
        };
        let resolver = SourceResolver::new(
            config.mode,
            provider.clone(),
            config.retry.clone(),
            prompts,
        );

        Self {
            resolver,
            provider,
            display: config.display,
            dither: config.dither,
        }
    }

    pub fn display(&self) -> DisplayConfig {
        self.display
    }

    pub fn mode(&self) -> SourceMode {
        self.resolver.mode()
    }

    /// Fetch a new picture and turn it into a panel-ready BMP.
    pub async fn produce_fresh(&self) -> Result<Bytes, PipelineError> {
        let url = self
            .resolver
            .resolve()
            .await
            .ok_or(PipelineError::NoCandidateFound)?;

        tracing::info!(%url, "downloading source image");
        let data = self.provider.download(&url).await?;
        tracing::debug!(bytes = data.len(), "download complete");

        let target = self.display;
        let dither = self.dither;
        let bmp = tokio::task::spawn_blocking(move || render_bitmap(&data, target, dither))
            .await
            .map_err(|e| PipelineError::ProcessingFailed(format!("Render task failed: {}", e)))??;

        tracing::info!(
            width = target.width,
            height = target.height,
            bytes = bmp.len(),
            "rendered bitmap"
        );
        Ok(Bytes::from(bmp))
    }
}

/// Decode, fit and quantize downloaded image bytes.
///
/// Synchronous and CPU-bound; also used directly by the `render` command.
pub fn render_bitmap(
    data: &[u8],
    display: DisplayConfig,
    dither: DitheringAlgorithm,
) -> Result<Vec<u8>, PipelineError> {
    let source = image::load_from_memory(data)
        .map_err(|e| PipelineError::DecodeFailed(format!("Failed to decode image: {}", e)))?
        .to_rgb8();

    let fitted = resize::crop_to_fill(&source, display.width, display.height, FilterType::Lanczos3)?;
    render::quantize(&fitted, dither)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 90])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_render_bitmap_dimensions() {
        let display = DisplayConfig::custom(80, 48);
        let bmp = render_bitmap(&png_bytes(160, 160), display, DitheringAlgorithm::FloydSteinberg)
            .unwrap();

        let decoded = image::load_from_memory(&bmp).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (80, 48));
    }

    #[test]
    fn test_render_bitmap_rejects_garbage() {
        let result = render_bitmap(
            b"definitely not an image",
            DisplayConfig::default(),
            DitheringAlgorithm::FloydSteinberg,
        );
        assert!(matches!(result, Err(PipelineError::DecodeFailed(_))));
    }
}
