//! # Indexed BMP Encoding
//!
//! The panel firmware reads a plain Windows bitmap: no compression, one byte
//! per pixel, full 256-entry color table.
//!
//! ```text
//! offset  size   field
//! 0       14     BITMAPFILEHEADER   "BM", file size, pixel data offset
//! 14      40     BITMAPINFOHEADER   width, height, 1 plane, 8 bpp, BI_RGB
//! 54      1024   color table        256 × (B, G, R, 0)
//! 1078    w×h    pixel indices      bottom-up rows, padded to 4 bytes
//! ```

use image::{ExtendedColorType, codecs::bmp::BmpEncoder};

use super::palette;
use crate::error::PipelineError;

/// Size of the file header, info header and color table together.
pub const PIXEL_DATA_OFFSET: usize = 14 + 40 + palette::TABLE_SIZE * 4;

/// Bytes per stored row, padded to a multiple of four.
#[inline]
pub fn row_stride(width: u32) -> usize {
    (width as usize).div_ceil(4) * 4
}

/// Total encoded size of an indexed bitmap.
#[inline]
pub fn encoded_len(width: u32, height: u32) -> usize {
    PIXEL_DATA_OFFSET + row_stride(width) * height as usize
}

/// Encode row-major palette indices as an 8-bit indexed BMP.
pub fn encode_indexed(indices: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PipelineError> {
    let expected = width as usize * height as usize;
    if indices.len() != expected {
        return Err(PipelineError::ProcessingFailed(format!(
            "Index buffer holds {} pixels, expected {}x{}",
            indices.len(),
            width,
            height
        )));
    }

    let mut output = Vec::with_capacity(encoded_len(width, height));
    BmpEncoder::new(&mut output)
        .encode_with_palette(
            indices,
            width,
            height,
            ExtendedColorType::L8,
            Some(&palette::TABLE),
        )
        .map_err(|e| PipelineError::ProcessingFailed(format!("BMP encode error: {}", e)))?;

    Ok(output)
}
