//! Fixed tone curve applied through a lookup table.

use image::RgbImage;

use super::TONE_CURVE;

/// Map a single channel level through the tone curve.
#[inline]
pub fn tone_level(level: u8) -> u8 {
    TONE_CURVE[level as usize]
}

/// Apply the tone curve to every channel of every pixel, in place.
pub fn apply_tone_curve(image: &mut RgbImage) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = tone_level(*channel);
        }
    }
}
