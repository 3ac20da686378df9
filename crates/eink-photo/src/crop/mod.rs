//! Face-aware cropping to the display aspect.
//!
//! [`CropRect::compute`] is the pure geometry; [`SmartCrop`] applies it and
//! resamples the crop to the exact target size with Lanczos3.

mod face;
mod rect;

pub use face::FaceBox;
pub use rect::{CropRect, DEFAULT_FACE_MARGIN};

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Crops an image around detected faces and resizes it to the target.
#[derive(Debug, Clone, Copy)]
pub struct SmartCrop {
    target_width: u32,
    target_height: u32,
    margin: f64,
}

impl SmartCrop {
    /// Create a cropper for the given target size.
    ///
    /// Both dimensions must be non-zero.
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            margin: DEFAULT_FACE_MARGIN,
        }
    }

    /// Set the fraction by which the union face box is expanded.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// The crop rectangle this cropper would use for `image`.
    pub fn crop_rect(&self, image: &RgbImage, faces: &[FaceBox]) -> CropRect {
        CropRect::compute(
            image.width(),
            image.height(),
            faces,
            self.target_width,
            self.target_height,
            self.margin,
        )
    }

    /// Crop and resample; the result is exactly the target size.
    ///
    /// `image` must be non-empty.
    pub fn crop(&self, image: &RgbImage, faces: &[FaceBox]) -> RgbImage {
        let rect = self.crop_rect(image, faces);
        let (x, y, w, h) = rect.to_pixel_bounds(image.width(), image.height());
        tracing::debug!(x, y, w, h, faces = faces.len(), "Crop rectangle");

        let cropped = imageops::crop_imm(image, x, y, w, h).to_image();
        if cropped.dimensions() == (self.target_width, self.target_height) {
            return cropped;
        }
        imageops::resize(
            &cropped,
            self.target_width,
            self.target_height,
            FilterType::Lanczos3,
        )
    }
}
