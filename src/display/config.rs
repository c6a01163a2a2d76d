//! # Display Configuration
//!
//! This module defines the panel geometry every generated image is fitted to.
//!
//! ## Supported Displays
//!
//! | Model | Resolution | Colors |
//! |-------|------------|--------|
//! | 7.5" three-color (B) | 800 × 480 | black, white, red |
//!
//! ## Usage
//!
//! ```
//! use cat_ink::display::DisplayConfig;
//!
//! let config = DisplayConfig::EPD_7IN5_B;
//! println!("Panel: {}x{}", config.width, config.height);
//!
//! // User-supplied sizes go through the checked constructor
//! assert!(DisplayConfig::checked(1200, 825).is_ok());
//! assert!(DisplayConfig::checked(0, 480).is_err());
//! ```

use crate::error::CatInkError;

/// # Display Configuration
///
/// Width and height of the panel in pixels. Images are always produced at
/// exactly this size; the aspect ratio comes from here, never from the
/// source picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Panel model name
    pub name: &'static str,

    /// Horizontal resolution in pixels
    pub width: u32,

    /// Vertical resolution in pixels
    pub height: u32,
}

impl DisplayConfig {
    /// # 7.5" Three-Color Panel
    ///
    /// Landscape 800 × 480 panel with black, white and red pigments.
    ///
    /// ```text
    /// ┌──────────────── 800 px ────────────────┐
    /// │                                        │ 480 px
    /// └────────────────────────────────────────┘
    /// ```
    pub const EPD_7IN5_B: Self = Self {
        name: "7.5in three-color",
        width: 800,
        height: 480,
    };

    /// Largest accepted width or height.
    pub const MAX_DIMENSION: u32 = 16_384;

    /// A panel with arbitrary dimensions.
    pub const fn custom(width: u32, height: u32) -> Self {
        Self {
            name: "custom",
            width,
            height,
        }
    }

    /// A custom panel size, rejecting zero or absurd dimensions.
    ///
    /// Each side must be between 1 and [`DisplayConfig::MAX_DIMENSION`].
    pub fn checked(width: u32, height: u32) -> Result<Self, CatInkError> {
        let valid = 1..=Self::MAX_DIMENSION;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(CatInkError::Config(format!(
                "Display size must be between 1 and {} on each side, got {}x{}",
                Self::MAX_DIMENSION,
                width,
                height
            )));
        }
        Ok(Self::custom(width, height))
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::EPD_7IN5_B
    }
}
