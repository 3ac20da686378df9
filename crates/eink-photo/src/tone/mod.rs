//! Tone adjustment ahead of quantization.
//!
//! E-ink panels render flatter and darker than the photos were graded for.
//! The adjuster compensates in three fixed steps:
//!
//! 1. **Tone curve**: a 256-entry lookup table generated at build time
//!    (midtone lift, then highlight roll-off)
//! 2. **Saturation boost**: blend away from the luminance gray
//! 3. **Local contrast**: unsharp mask with a small radius
//!
//! # Example
//!
//! ```
//! use eink_photo::{ToneAdjuster, ToneOptions};
//! use image::{Rgb, RgbImage};
//!
//! let adjuster = ToneAdjuster::new(ToneOptions::default());
//! let image = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
//! let adjusted = adjuster.adjust(&image);
//! assert_eq!(adjusted.dimensions(), (4, 4));
//! ```

mod curve;
mod enhance;
mod options;

pub use curve::{apply_tone_curve, tone_level};
pub use enhance::{boost_saturation, luminance, unsharp_mask};
pub use options::ToneOptions;

use image::RgbImage;

include!(concat!(env!("OUT_DIR"), "/tone_lut.rs"));

/// Applies the tone curve, saturation boost and local contrast in order.
#[derive(Debug, Clone, Default)]
pub struct ToneAdjuster {
    options: ToneOptions,
}

impl ToneAdjuster {
    pub fn new(options: ToneOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ToneOptions {
        &self.options
    }

    /// Adjust an image. Pure and deterministic; dimensions are preserved.
    pub fn adjust(&self, image: &RgbImage) -> RgbImage {
        let mut working = image.clone();
        if self.options.tone_curve {
            apply_tone_curve(&mut working);
        }
        boost_saturation(&mut working, self.options.saturation);
        unsharp_mask(
            &working,
            self.options.blur_radius,
            self.options.sharpen_percent(),
            self.options.threshold,
        )
    }
}
