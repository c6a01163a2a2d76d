//! End-to-end pipeline runs against in-memory providers.

mod common;

use async_trait::async_trait;
use bytes::Bytes;
use cat_ink::{
    DisplayConfig, Pipeline, PipelineConfig, PipelineError,
    error::LookupError,
    pipeline::render_bitmap,
    render::{dither::DitheringAlgorithm, palette::PaletteIndex},
    source::{ImageProvider, SourceCandidate, SourceMode},
};
use common::{StubProvider, png_bytes};
use image::ImageFormat;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn small_config() -> PipelineConfig {
    PipelineConfig {
        display: DisplayConfig::custom(64, 40),
        ..Default::default()
    }
}

/// Catalog that only ever offers GIFs.
struct AnimatedOnly;

#[async_trait]
impl ImageProvider for AnimatedOnly {
    async fn lookup(&self, _tag: Option<&str>) -> Result<SourceCandidate, LookupError> {
        Ok(SourceCandidate {
            id: "gif".to_string(),
            url: "https://catalog.test/cat/gif".to_string(),
            media_type: Some("image/gif".to_string()),
        })
    }

    async fn download(&self, _url: &str) -> Result<Bytes, PipelineError> {
        panic!("animated candidates must never be downloaded");
    }
}

/// Serves bytes that are not an image.
struct Garbage;

#[async_trait]
impl ImageProvider for Garbage {
    async fn lookup(&self, _tag: Option<&str>) -> Result<SourceCandidate, LookupError> {
        Ok(SourceCandidate {
            id: "x".to_string(),
            url: "https://catalog.test/cat/x".to_string(),
            media_type: None,
        })
    }

    async fn download(&self, _url: &str) -> Result<Bytes, PipelineError> {
        Ok(Bytes::from_static(b"<html>not a cat</html>"))
    }
}

#[tokio::test]
async fn test_catalog_pipeline_produces_panel_bitmap() {
    let provider = Arc::new(StubProvider::new());
    let pipeline = Pipeline::new(&small_config(), provider.clone());

    let bmp = pipeline.produce_fresh().await.unwrap();

    let decoded = image::load_from_memory_with_format(&bmp, ImageFormat::Bmp)
        .unwrap()
        .to_rgb8();
    assert_eq!(decoded.dimensions(), (64, 40));
    assert!(decoded.pixels().all(|p| PaletteIndex::from_rgb(p.0).is_some()));
    // Still candidate on the first tagged lookup.
    assert_eq!(provider.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(provider.downloads(), 1);
}

#[tokio::test]
async fn test_prompt_pipeline_skips_catalog() {
    let provider = Arc::new(StubProvider::new());
    let config = PipelineConfig {
        mode: SourceMode::Prompt,
        ..small_config()
    };
    let pipeline = Pipeline::new(&config, provider.clone());

    pipeline.produce_fresh().await.unwrap();

    assert_eq!(provider.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(provider.downloads(), 1);
}

#[tokio::test]
async fn test_only_animated_candidates_is_no_candidate() {
    let pipeline = Pipeline::new(&small_config(), Arc::new(AnimatedOnly));
    let err = pipeline.produce_fresh().await.unwrap_err();
    assert_eq!(err, PipelineError::NoCandidateFound);
}

#[tokio::test]
async fn test_undecodable_download_is_decode_failure() {
    let pipeline = Pipeline::new(&small_config(), Arc::new(Garbage));
    let err = pipeline.produce_fresh().await.unwrap_err();
    assert!(matches!(err, PipelineError::DecodeFailed(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_download_failure_propagates() {
    let provider = Arc::new(StubProvider::new());
    provider.set_failing(true);
    let pipeline = Pipeline::new(&small_config(), provider);

    let err = pipeline.produce_fresh().await.unwrap_err();
    assert!(matches!(err, PipelineError::DownloadFailed(_)), "got {:?}", err);
}

#[test]
fn test_render_bitmap_all_algorithms() {
    let data = png_bytes(100, 300);
    let display = DisplayConfig::custom(50, 30);

    for algorithm in [
        DitheringAlgorithm::FloydSteinberg,
        DitheringAlgorithm::Atkinson,
        DitheringAlgorithm::None,
    ] {
        let bmp = render_bitmap(&data, display, algorithm).unwrap();
        let decoded = image::load_from_memory_with_format(&bmp, ImageFormat::Bmp).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (50, 30), "{}", algorithm);
    }
}
