//! Palette struct with validated colors and nearest-color matching.

use std::collections::HashSet;

use super::error::PaletteError;

/// Maximum number of entries an indexed output image can address.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Built-in 6-color palette for Spectra 6 panels.
///
/// Black, white, red, green, blue and yellow as the panel actually renders
/// them (the saturated primaries are deliberately muted).
pub const DEFAULT_PALETTE: [[u8; 3]; 6] = [
    [0, 0, 0],
    [255, 255, 255],
    [180, 40, 30],
    [0, 170, 0],
    [0, 70, 200],
    [240, 220, 0],
];

/// An ordered set of exact output colors a display can render.
///
/// Invariants enforced at construction:
/// - at least one color
/// - at most [`MAX_PALETTE_SIZE`] colors
/// - no two colors are byte-identical
///
/// Colors keep their input order; the position of a color is its index in
/// dithered output.
///
/// # Example
///
/// ```
/// use eink_photo::Palette;
///
/// let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest([200.0, 190.0, 210.0]), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Create a palette from RGB triples.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] when `colors` is empty
    /// - [`PaletteError::TooManyColors`] when more than 256 colors are given
    /// - [`PaletteError::DuplicateColor`] on the first repeated color
    pub fn new(colors: &[[u8; 3]]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
                max: MAX_PALETTE_SIZE,
            });
        }

        let mut seen = HashSet::new();
        for (index, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index });
            }
        }

        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// The built-in 6-color e-ink palette.
    pub fn default_eink() -> Self {
        Self {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }

    /// Number of colors in the palette (always at least 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn color(&self, index: usize) -> [u8; 3] {
        self.colors[index]
    }

    /// All colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Whether `color` is byte-identical to a palette entry.
    pub fn contains(&self, color: [u8; 3]) -> bool {
        self.colors.contains(&color)
    }

    /// Find the palette entry closest to `pixel` by Euclidean RGB distance.
    ///
    /// Ties resolve to the lowest index.
    pub fn find_nearest(&self, pixel: [f32; 3]) -> usize {
        let mut best_index = 0;
        let mut best_dist = f32::INFINITY;

        for (index, color) in self.colors.iter().enumerate() {
            let dr = pixel[0] - color[0] as f32;
            let dg = pixel[1] - color[1] as f32;
            let db = pixel[2] - color[2] as f32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best_index = index;
            }
        }

        best_index
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::default_eink()
    }
}
