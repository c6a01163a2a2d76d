//! # Crop-to-Fill Resizing
//!
//! Fits an arbitrary source picture onto the panel without letterboxing:
//! scale uniformly until the panel is covered, then cut the overflow evenly
//! from both sides of the long dimension.
//!
//! ```text
//! source 1600×1600, target 800×480
//!
//!   target ratio 1.667 > source ratio 1.0  →  match widths
//!
//!   scale = 800 / 1600 = 0.5      ┌────────┐ row 0
//!   scaled = 800 × 800            │ crop   │
//!   offset = (800 - 480) / 2      ├────────┤ row 160
//!          = 160                  │ kept   │
//!                                 ├────────┤ row 640
//!                                 │ crop   │
//!                                 └────────┘ row 800
//! ```
//!
//! Scaled dimensions are truncated to integers and the offset uses floor
//! division, so an odd overflow pixel comes off the trailing edge.
//!
//! The plan is expressed in scaled coordinates, but the image is never
//! scaled whole: the kept window is mapped back onto the source, cut out, and
//! only that piece is resampled to the target. A 1×20000 strip on an 800×480
//! panel therefore allocates a one-pixel crop and the 800×480 result rather
//! than an 800×16,000,000 intermediate.

use image::{RgbImage, imageops};

pub use image::imageops::FilterType;

use crate::error::PipelineError;

/// Where a crop-to-fill resize lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    /// Width after the uniform scale, before cropping
    pub scaled_width: u32,
    /// Height after the uniform scale, before cropping
    pub scaled_height: u32,
    /// Left edge of the kept window in the scaled image
    pub x: u32,
    /// Top edge of the kept window in the scaled image
    pub y: u32,
    /// Width of the kept window (the target width)
    pub width: u32,
    /// Height of the kept window (the target height)
    pub height: u32,
}

impl CropPlan {
    /// Compute the scale and crop window for a source of `src_width × src_height`.
    pub fn new(
        src_width: u32,
        src_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> Result<Self, PipelineError> {
        if src_width == 0 || src_height == 0 {
            return Err(PipelineError::ProcessingFailed(format!(
                "Source image has no pixels ({}x{})",
                src_width, src_height
            )));
        }
        if target_width == 0 || target_height == 0 {
            return Err(PipelineError::ProcessingFailed(format!(
                "Invalid target size {}x{}",
                target_width, target_height
            )));
        }

        let source_ratio = src_width as f64 / src_height as f64;
        let target_ratio = target_width as f64 / target_height as f64;

        let plan = if target_ratio > source_ratio {
            // Source is taller: match widths, crop top and bottom
            let scale = target_width as f64 / src_width as f64;
            let scaled_height = ((src_height as f64 * scale) as u32).max(target_height);
            Self {
                scaled_width: target_width,
                scaled_height,
                x: 0,
                y: (scaled_height - target_height) / 2,
                width: target_width,
                height: target_height,
            }
        } else {
            // Source is wider (or identical): match heights, crop left and right
            let scale = target_height as f64 / src_height as f64;
            let scaled_width = ((src_width as f64 * scale) as u32).max(target_width);
            Self {
                scaled_width,
                scaled_height: target_height,
                x: (scaled_width - target_width) / 2,
                y: 0,
                width: target_width,
                height: target_height,
            }
        };

        Ok(plan)
    }

    /// True when nothing is cropped away and the result is a plain rescale.
    pub fn is_pure_scale(&self) -> bool {
        self.scaled_width == self.width && self.scaled_height == self.height
    }

    /// The kept window in source coordinates, as `(x, y, width, height)`.
    ///
    /// Never empty and never outside the `src_width × src_height` source.
    pub fn source_window(&self, src_width: u32, src_height: u32) -> (u32, u32, u32, u32) {
        let (x, width) = map_span(self.x, self.width, self.scaled_width, src_width);
        let (y, height) = map_span(self.y, self.height, self.scaled_height, src_height);
        (x, y, width, height)
    }
}

/// Map `[offset, offset + len)` on a `scaled`-long axis onto a `source`-long one.
fn map_span(offset: u32, len: u32, scaled: u32, source: u32) -> (u32, u32) {
    let factor = source as f64 / scaled as f64;
    let start = ((offset as f64 * factor).floor() as u32).min(source - 1);
    let len = ((len as f64 * factor).round() as u32).clamp(1, source - start);
    (start, len)
}

/// Resize `source` to cover `target_width × target_height`, then center-crop.
///
/// The result is always exactly the target size.
pub fn crop_to_fill(
    source: &RgbImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbImage, PipelineError> {
    let (src_width, src_height) = source.dimensions();
    let plan = CropPlan::new(src_width, src_height, target_width, target_height)?;

    tracing::debug!(
        src_width,
        src_height,
        scaled_width = plan.scaled_width,
        scaled_height = plan.scaled_height,
        crop_x = plan.x,
        crop_y = plan.y,
        "crop-to-fill"
    );

    let (x, y, width, height) = plan.source_window(src_width, src_height);
    let window = if (x, y, width, height) == (0, 0, src_width, src_height) {
        source.clone()
    } else {
        imageops::crop_imm(source, x, y, width, height).to_image()
    };

    if window.dimensions() == (target_width, target_height) {
        return Ok(window);
    }
    Ok(imageops::resize(&window, target_width, target_height, filter))
}
