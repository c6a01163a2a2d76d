//! # Three-Color Palette
//!
//! The panel can show exactly three pigments. Indexed bitmaps still carry a
//! 256-entry color table, so the palette is padded with black filler:
//!
//! ```text
//! index:  0        1              2            3 .. 255
//!         black    white          red          (unused, black)
//!         #000000  #ffffff        #ff0000      #000000
//! ```
//!
//! Only the first three entries are ever offered to the quantizer, so the
//! filler never shows up in pixel data.

/// Number of entries in the color table of an 8-bit indexed bitmap.
pub const TABLE_SIZE: usize = 256;

pub const BLACK: [u8; 3] = [0, 0, 0];
pub const WHITE: [u8; 3] = [255, 255, 255];
pub const RED: [u8; 3] = [255, 0, 0];

/// The colors pixels may be quantized to, in index order.
pub const COLORS: [[u8; 3]; 3] = [BLACK, WHITE, RED];

/// Full color table written into the bitmap header.
pub const TABLE: [[u8; 3]; TABLE_SIZE] = {
    let mut table = [BLACK; TABLE_SIZE];
    table[PaletteIndex::White as usize] = WHITE;
    table[PaletteIndex::Red as usize] = RED;
    table
};

/// Position of a pigment in the color table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PaletteIndex {
    Black = 0,
    White = 1,
    Red = 2,
}

impl PaletteIndex {
    pub const ALL: [PaletteIndex; 3] = [PaletteIndex::Black, PaletteIndex::White, PaletteIndex::Red];

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn rgb(self) -> [u8; 3] {
        COLORS[self as usize]
    }

    /// Reverse lookup from an exact palette color.
    pub fn from_rgb(rgb: [u8; 3]) -> Option<Self> {
        Self::ALL.into_iter().find(|index| index.rgb() == rgb)
    }
}

/// Find the nearest palette color using squared Euclidean distance in RGB.
///
/// Channels may be out of `0..=255` while error diffusion is carrying
/// overflow; they are compared as-is.
pub fn nearest(r: i32, g: i32, b: i32) -> PaletteIndex {
    let mut best = PaletteIndex::Black;
    let mut best_distance = i32::MAX;

    for index in PaletteIndex::ALL {
        let [pr, pg, pb] = index.rgb();
        let dr = r - pr as i32;
        let dg = g - pg as i32;
        let db = b - pb as i32;
        let distance = dr * dr + dg * dg + db * db;
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        assert_eq!(TABLE.len(), 256);
        assert_eq!(TABLE[0], BLACK);
        assert_eq!(TABLE[1], WHITE);
        assert_eq!(TABLE[2], RED);
        assert!(TABLE[3..].iter().all(|&c| c == BLACK), "filler must be black");
    }

    #[test]
    fn test_nearest_exact_colors() {
        assert_eq!(nearest(0, 0, 0), PaletteIndex::Black);
        assert_eq!(nearest(255, 255, 255), PaletteIndex::White);
        assert_eq!(nearest(255, 0, 0), PaletteIndex::Red);
    }

    #[test]
    fn test_nearest_approximate_colors() {
        assert_eq!(nearest(40, 30, 35), PaletteIndex::Black);
        assert_eq!(nearest(220, 230, 210), PaletteIndex::White);
        assert_eq!(nearest(200, 40, 30), PaletteIndex::Red);
        // Blue has no pigment; it is darker than it is white or red
        assert_eq!(nearest(0, 0, 255), PaletteIndex::Black);
    }

    #[test]
    fn test_nearest_out_of_range() {
        assert_eq!(nearest(-80, -80, -80), PaletteIndex::Black);
        assert_eq!(nearest(400, 300, 300), PaletteIndex::White);
    }

    #[test]
    fn test_index_lookups() {
        assert_eq!(PaletteIndex::from_rgb(WHITE), Some(PaletteIndex::White));
        assert_eq!(PaletteIndex::from_rgb([1, 2, 3]), None);
    }
}
