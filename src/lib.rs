//! # Cat Ink - Cat Pictures for Three-Color E-Paper
//!
//! Cat Ink fetches a cat picture (a catalog photo or a generated ink sketch),
//! fits it to an e-paper panel and dithers it down to black, white and red.
//! It provides:
//!
//! - **Source selection**: tag-filtered catalog lookups with retry and fallback
//! - **Geometry**: crop-to-fill resizing with no letterboxing
//! - **Dithering**: Floyd-Steinberg error diffusion to a 3-color palette
//! - **Encoding**: 8-bit indexed BMP with a 256-entry color table
//! - **Serving**: an HTTP endpoint with a single-slot TTL cache
//!
//! ## Quick Start
//!
//! ```no_run
//! use cat_ink::{
//!     pipeline::{Pipeline, PipelineConfig},
//!     source::HttpProvider,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), cat_ink::CatInkError> {
//! let config = PipelineConfig::default();
//! let provider = HttpProvider::new(config.provider.clone())?;
//! let pipeline = Pipeline::new(&config, Arc::new(provider));
//!
//! // 800x480 black/white/red bitmap, ready for the panel
//! let bmp = pipeline.produce_fresh().await?;
//! std::fs::write("cat.bmp", &bmp)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`source`] | Upstream providers and candidate resolution |
//! | [`render`] | Palette, resizing, dithering, BMP encoding |
//! | [`pipeline`] | Resolve → download → render |
//! | [`cache`] | Single-slot TTL cache |
//! | [`server`] | HTTP routes |
//! | [`display`] | Panel geometries |
//! | [`error`] | Error types |

pub mod cache;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod source;

// Re-exports for convenience
pub use display::DisplayConfig;
pub use error::{CatInkError, PipelineError};
pub use pipeline::{Pipeline, PipelineConfig};
