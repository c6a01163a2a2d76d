//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use cat_ink::{
    cache::ManualClock,
    error::{LookupError, PipelineError},
    server::{AppState, ServerConfig},
    source::{ImageProvider, SourceCandidate},
};
use chrono::{TimeZone, Utc};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// A PNG with a gradient so dithering has something to do.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// In-memory provider that always returns the same still PNG.
pub struct StubProvider {
    image: Bytes,
    failing: AtomicBool,
    delay_ms: AtomicU64,
    pub lookups: AtomicUsize,
    pub downloads: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            image: Bytes::from(png_bytes(320, 240)),
            failing: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            lookups: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    /// Make every following download fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every following download take this long.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for StubProvider {
    async fn lookup(&self, tag: Option<&str>) -> Result<SourceCandidate, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let id = tag.unwrap_or("any").to_string();
        Ok(SourceCandidate {
            url: format!("https://catalog.test/cat/{}", id),
            id,
            media_type: Some("image/png".to_string()),
        })
    }

    async fn download(&self, url: &str) -> Result<Bytes, PipelineError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PipelineError::DownloadFailed(format!(
                "connection refused: {}",
                url
            )));
        }
        Ok(self.image.clone())
    }
}

pub const TTL: Duration = Duration::from_secs(180);

/// Small panel so renders stay quick.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig {
        cache_ttl: TTL,
        ..Default::default()
    };
    config.pipeline.display = cat_ink::DisplayConfig::custom(80, 48);
    config
}

/// App state wired to a stub provider and a manual clock.
pub fn test_state() -> (Arc<AppState>, Arc<StubProvider>, Arc<ManualClock>) {
    let provider = Arc::new(StubProvider::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    ));
    let state = AppState::with_parts(test_config(), provider.clone(), clock.clone()).unwrap();
    (Arc::new(state), provider, clock)
}
