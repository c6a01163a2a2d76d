//! # Error-Diffusion Dithering
//!
//! Converts a true-color image into palette indices for the three-color
//! panel (see [`palette`](super::palette)).
//!
//! ## What is Error Diffusion?
//!
//! Each pixel is snapped to the nearest available pigment. The difference
//! between the wanted color and the pigment (the quantization error) is
//! pushed onto neighbors that have not been visited yet, so that on average
//! an area keeps its original tone:
//!
//! ```text
//! Floyd-Steinberg (÷16)        Atkinson (÷8, drops 1/4 of the error)
//!
//!        *   7                        *   1   1
//!    3   5   1                    1   1   1
//!                                     1
//! ```
//!
//! Gradients come out as dot patterns instead of hard bands, at the cost of
//! exact color fidelity.
//!
//! ## Comparison
//!
//! | Method | Quality | Artifacts |
//! |--------|---------|-----------|
//! | Floyd-Steinberg | Best for photos | Fine noise, "worms" |
//! | Atkinson | Punchier, lighter | Blown highlights and shadows |
//! | None | Poor | Banding, lost detail |
//!
//! ## Usage Example
//!
//! ```
//! use cat_ink::render::dither::{self, DitheringAlgorithm};
//! use image::{Rgb, RgbImage};
//!
//! let img = RgbImage::from_pixel(16, 16, Rgb([128, 128, 128]));
//! let indices = dither::quantize_indices(&img, DitheringAlgorithm::FloydSteinberg);
//!
//! assert_eq!(indices.len(), 16 * 16);
//! assert!(indices.iter().all(|&i| i <= 2));
//! ```

use image::RgbImage;
use std::{fmt, str::FromStr};

use super::palette;

/// Dithering algorithm used to reduce an image to the panel palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitheringAlgorithm {
    /// Nearest color only
    None,
    /// Classic 4-neighbor error diffusion
    #[default]
    FloydSteinberg,
    /// 6-neighbor diffusion of 3/4 of the error
    Atkinson,
}

impl FromStr for DitheringAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "threshold" => Ok(DitheringAlgorithm::None),
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Ok(DitheringAlgorithm::FloydSteinberg),
            "atkinson" => Ok(DitheringAlgorithm::Atkinson),
            other => Err(format!(
                "unknown dithering algorithm '{}' (expected floyd-steinberg, atkinson or none)",
                other
            )),
        }
    }
}

impl fmt::Display for DitheringAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DitheringAlgorithm::None => "none",
            DitheringAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitheringAlgorithm::Atkinson => "atkinson",
        };
        f.write_str(name)
    }
}

/// One neighbor in a diffusion kernel: offset and share of the error.
struct Tap {
    dx: isize,
    dy: usize,
    weight: i32,
}

const fn tap(dx: isize, dy: usize, weight: i32) -> Tap {
    Tap { dx, dy, weight }
}

const FLOYD_STEINBERG: (&[Tap], i32) = (
    &[tap(1, 0, 7), tap(-1, 1, 3), tap(0, 1, 5), tap(1, 1, 1)],
    16,
);

const ATKINSON: (&[Tap], i32) = (
    &[
        tap(1, 0, 1),
        tap(2, 0, 1),
        tap(-1, 1, 1),
        tap(0, 1, 1),
        tap(1, 1, 1),
        tap(0, 2, 1),
    ],
    8,
);

/// Quantize an image to palette indices, one byte per pixel in row-major order.
///
/// Every returned value is a meaningful palette index (0, 1 or 2).
pub fn quantize_indices(img: &RgbImage, algorithm: DitheringAlgorithm) -> Vec<u8> {
    let (taps, divisor): (&[Tap], i32) = match algorithm {
        DitheringAlgorithm::None => (&[], 1),
        DitheringAlgorithm::FloydSteinberg => FLOYD_STEINBERG,
        DitheringAlgorithm::Atkinson => ATKINSON,
    };
    diffuse(img, taps, divisor)
}

fn diffuse(img: &RgbImage, taps: &[Tap], divisor: i32) -> Vec<u8> {
    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);

    // i32 working buffer so accumulated error can leave 0..=255
    let mut buffer: Vec<[i32; 3]> = img
        .pixels()
        .map(|p| [p[0] as i32, p[1] as i32, p[2] as i32])
        .collect();
    let mut indices = vec![0u8; buffer.len()];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let [r, g, b] = buffer[idx];
            let chosen = palette::nearest(r, g, b);
            indices[idx] = chosen.as_u8();

            if taps.is_empty() {
                continue;
            }

            let [pr, pg, pb] = chosen.rgb();
            let error = [r - pr as i32, g - pg as i32, b - pb as i32];

            for tap in taps {
                let Some(nx) = x.checked_add_signed(tap.dx) else {
                    continue;
                };
                let ny = y + tap.dy;
                if nx >= width || ny >= height {
                    continue;
                }
                let neighbor = &mut buffer[ny * width + nx];
                for c in 0..3 {
                    neighbor[c] += error[c] * tap.weight / divisor;
                }
            }
        }
    }

    indices
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::palette::PaletteIndex;
    use image::Rgb;

    const ALGORITHMS: [DitheringAlgorithm; 3] = [
        DitheringAlgorithm::None,
        DitheringAlgorithm::FloydSteinberg,
        DitheringAlgorithm::Atkinson,
    ];

    fn count(indices: &[u8], index: PaletteIndex) -> usize {
        indices.iter().filter(|&&i| i == index.as_u8()).count()
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("fs".parse(), Ok(DitheringAlgorithm::FloydSteinberg));
        assert_eq!("Floyd-Steinberg".parse(), Ok(DitheringAlgorithm::FloydSteinberg));
        assert_eq!("atkinson".parse(), Ok(DitheringAlgorithm::Atkinson));
        assert_eq!("threshold".parse(), Ok(DitheringAlgorithm::None));
        assert!("bayer".parse::<DitheringAlgorithm>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for algorithm in ALGORITHMS {
            assert_eq!(algorithm.to_string().parse(), Ok(algorithm));
        }
    }

    #[test]
    fn test_solid_pigments_stay_solid() {
        for algorithm in ALGORITHMS {
            for index in PaletteIndex::ALL {
                let img = RgbImage::from_pixel(20, 10, Rgb(index.rgb()));
                let indices = quantize_indices(&img, algorithm);
                assert_eq!(count(&indices, index), 200, "{} / {:?}", algorithm, index);
            }
        }
    }

    #[test]
    fn test_only_meaningful_indices() {
        // Colorful gradient with channels the panel cannot show
        let img = RgbImage::from_fn(64, 64, |x, y| {
            Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        });
        for algorithm in ALGORITHMS {
            let indices = quantize_indices(&img, algorithm);
            assert_eq!(indices.len(), 64 * 64);
            assert!(indices.iter().all(|&i| i <= 2), "{} produced filler index", algorithm);
        }
    }

    #[test]
    fn test_mid_gray_mixes_black_and_white() {
        let img = RgbImage::from_pixel(32, 32, Rgb([128, 128, 128]));
        let indices = quantize_indices(&img, DitheringAlgorithm::FloydSteinberg);
        let white = count(&indices, PaletteIndex::White);
        let black = count(&indices, PaletteIndex::Black);

        assert!(white > 300 && white < 724, "expected roughly half white, got {}", white);
        assert!(black > 300, "expected plenty of black, got {}", black);
    }

    #[test]
    fn test_without_diffusion_gray_collapses() {
        let img = RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]));
        let indices = quantize_indices(&img, DitheringAlgorithm::None);
        assert_eq!(count(&indices, PaletteIndex::Black), 64);
    }

    #[test]
    fn test_pink_uses_red_and_white() {
        let img = RgbImage::from_pixel(32, 32, Rgb([255, 128, 128]));
        let indices = quantize_indices(&img, DitheringAlgorithm::FloydSteinberg);
        assert!(count(&indices, PaletteIndex::Red) > 0);
        assert!(count(&indices, PaletteIndex::White) > 0);
    }

    #[test]
    fn test_single_row_and_column_edges() {
        // Every tap that would land left of x = 0 or past the last column is skipped
        for (w, h) in [(1, 40), (40, 1), (2, 2)] {
            let img = RgbImage::from_fn(w, h, |x, y| Rgb([((x + y) * 6) as u8, 90, 160]));
            for algorithm in ALGORITHMS {
                let indices = quantize_indices(&img, algorithm);
                assert_eq!(indices.len(), (w * h) as usize);
                assert!(indices.iter().all(|&i| i <= 2), "{}x{} {}", w, h, algorithm);
            }
        }
    }

    #[test]
    fn test_empty_image() {
        let img = RgbImage::new(0, 0);
        assert!(quantize_indices(&img, DitheringAlgorithm::FloydSteinberg).is_empty());
    }
}
