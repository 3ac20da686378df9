//! DitheredImage: palette indices plus the palette they index.
//!
//! [`DitheredImage`] is the canonical output of the pipeline. The indexed
//! form is what gets stored; full-color output is computed on demand by
//! looking up palette colors, so every output pixel is byte-identical to a
//! palette entry.

use image::{Rgb, RgbImage};

use crate::palette::Palette;

/// The canonical output of the dithering pipeline.
///
/// Stores one `u8` palette index per pixel in row-major order, along with
/// image dimensions and the palette used for dithering.
///
/// # Example
///
/// ```
/// use eink_photo::{DitheredImage, Palette};
///
/// let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
///
/// // Simulate a 2x2 checkerboard dither result
/// let image = DitheredImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.width(), 2);
/// assert_eq!(image.height(), 2);
/// assert_eq!(image.to_rgb(), vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct DitheredImage {
    /// Palette indices, one per pixel, row-major order.
    indices: Vec<u8>,
    width: u32,
    height: u32,
    palette: Palette,
}

impl DitheredImage {
    /// Create a new `DitheredImage` from dithered palette indices.
    ///
    /// Each index must be in `0..palette.len()`.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: u32, height: u32, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices in row-major order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Flat `[R, G, B, R, G, B, ...]` bytes of length `width * height * 3`.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.color(idx as usize));
        }
        rgb
    }

    /// Full-color image where every pixel is a palette entry.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = self.indices[(y * self.width + x) as usize];
            Rgb(self.palette.color(idx as usize))
        })
    }
}
