//! # Rendering Module
//!
//! Turns a decoded picture into the bitmap the panel displays.
//!
//! ## Modules
//!
//! - [`palette`]: black/white/red color table
//! - [`resize`]: crop-to-fill geometry
//! - [`dither`]: error-diffusion quantization to the palette
//! - [`bmp`]: indexed bitmap encoding
//!
//! ## Usage Example
//!
//! ```
//! use cat_ink::render::{self, dither::DitheringAlgorithm, resize::FilterType};
//! use image::{Rgb, RgbImage};
//!
//! let photo = RgbImage::from_pixel(1600, 1600, Rgb([200, 120, 90]));
//! let fitted = render::resize::crop_to_fill(&photo, 800, 480, FilterType::Triangle)?;
//! let bmp = render::quantize(&fitted, DitheringAlgorithm::FloydSteinberg)?;
//!
//! assert_eq!(&bmp[0..2], b"BM");
//! # Ok::<(), cat_ink::error::PipelineError>(())
//! ```

pub mod bmp;
pub mod dither;
pub mod palette;
pub mod resize;

use image::RgbImage;

use crate::error::PipelineError;
use dither::DitheringAlgorithm;

/// Dither an already-fitted image and encode it as an indexed BMP.
pub fn quantize(img: &RgbImage, algorithm: DitheringAlgorithm) -> Result<Vec<u8>, PipelineError> {
    let (width, height) = img.dimensions();
    let indices = dither::quantize_indices(img, algorithm);
    bmp::encode_indexed(&indices, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use palette::PaletteIndex;

    #[test]
    fn test_quantized_bitmap_uses_only_pigments() {
        let img = RgbImage::from_fn(120, 72, |x, y| {
            Rgb([(x * 2) as u8, (y * 3) as u8, ((x * y) % 256) as u8])
        });
        let data = quantize(&img, DitheringAlgorithm::FloydSteinberg).unwrap();

        let decoded = image::load_from_memory_with_format(&data, ImageFormat::Bmp)
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (120, 72));
        for pixel in decoded.pixels() {
            assert!(
                PaletteIndex::from_rgb(pixel.0).is_some(),
                "unexpected color {:?}",
                pixel.0
            );
        }
    }
}
