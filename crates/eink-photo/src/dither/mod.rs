//! Error diffusion dithering against a fixed palette.
//!
//! Pixels are visited in raster order. Each pixel (plus the error diffused
//! into it so far) is replaced by its nearest palette color, and the
//! difference is pushed to neighbors that have not been visited yet
//! according to a [`Kernel`].
//!
//! # Example
//!
//! ```
//! use eink_photo::{Dither, FloydSteinberg, Palette};
//! use image::{Rgb, RgbImage};
//!
//! let palette = Palette::new(&[[0, 0, 0], [255, 255, 255]]).unwrap();
//! let image = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
//!
//! let indices = FloydSteinberg.dither(&image, &palette);
//! assert_eq!(indices.len(), 16);
//! ```

mod floyd_steinberg;
mod kernel;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, FLOYD_STEINBERG};

use image::RgbImage;

use crate::palette::Palette;

/// Trait for error diffusion dithering algorithms.
pub trait Dither {
    /// Dither an image to palette indices.
    ///
    /// Returns one index per pixel in row-major order; every index is in
    /// `0..palette.len()`.
    fn dither(&self, image: &RgbImage, palette: &Palette) -> Vec<u8>;
}

/// Error buffer for efficient error diffusion.
///
/// Manages a sliding window of error rows, storing only the rows that
/// the diffusion kernel can reach (determined by `max_dy`). Errors are in
/// 8-bit channel units.
///
/// # Usage Pattern
///
/// 1. Create buffer with `new(width, row_depth)`
/// 2. For each row:
///    a. Read accumulated error with `get_accumulated(x)`
///    b. After processing pixel, distribute error with `add_error(x, dy, error)`
///    c. After row complete, call `advance_row()`
#[derive(Debug)]
pub struct ErrorBuffer {
    /// Error rows: rows[0] is current row, rows[1] is next, etc.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a new error buffer `row_depth` rows deep.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Get accumulated error for a pixel in the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel.
    ///
    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Advance to the next row.
    ///
    /// The first row is discarded, subsequent rows shift forward, and a
    /// zeroed row is added at the end.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Core error diffusion loop parameterized by kernel.
///
/// The working value of each pixel (input plus accumulated error) is clamped
/// to the 8-bit range before matching, so the error a pixel passes on can
/// never exceed one full channel swing.
pub(crate) fn dither_with_kernel(image: &RgbImage, palette: &Palette, kernel: &Kernel) -> Vec<u8> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        for x in 0..width {
            let source = image.get_pixel(x as u32, y as u32).0;
            let accumulated = error_buf.get_accumulated(x);
            let pixel = [
                (source[0] as f32 + accumulated[0]).clamp(0.0, 255.0),
                (source[1] as f32 + accumulated[1]).clamp(0.0, 255.0),
                (source[2] as f32 + accumulated[2]).clamp(0.0, 255.0),
            ];

            let nearest = palette.find_nearest(pixel);
            output[y * width + x] = nearest as u8;

            let chosen = palette.color(nearest);
            let error = [
                pixel[0] - chosen[0] as f32,
                pixel[1] - chosen[1] as f32,
                pixel[2] - chosen[2] as f32,
            ];

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                let ny = y + dy as usize;
                if nx < 0 || nx as usize >= width || ny >= height {
                    continue;
                }
                let fraction = weight as f32 / divisor;
                error_buf.add_error(
                    nx as usize,
                    dy as usize,
                    [error[0] * fraction, error[1] * fraction, error[2] * fraction],
                );
            }
        }
        error_buf.advance_row();
    }

    output
}
