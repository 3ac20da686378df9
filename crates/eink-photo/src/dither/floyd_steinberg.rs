//! Floyd-Steinberg error diffusion dithering algorithm.
//!
//! Floyd-Steinberg distributes 100% of the quantization error to 4
//! neighbors, producing smooth gradients on small palettes.

use image::RgbImage;

use crate::palette::Palette;

use super::{dither_with_kernel, Dither, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion dithering.
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
/// Pixels are visited strictly left to right, top to bottom.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(&self, image: &RgbImage, palette: &Palette) -> Vec<u8> {
        dither_with_kernel(image, palette, &FLOYD_STEINBERG)
    }
}
