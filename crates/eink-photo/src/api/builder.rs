//! FramePreparer builder -- the primary entry point for the crate.
//!
//! [`FramePreparer`] runs smart crop, tone adjustment and dithering in order
//! behind a fluent builder API with the frame's defaults.

use image::RgbImage;

use super::error::PrepareError;
use crate::crop::{FaceBox, SmartCrop, DEFAULT_FACE_MARGIN};
use crate::dither::{Dither, FloydSteinberg};
use crate::output::DitheredImage;
use crate::palette::Palette;
use crate::tone::{ToneAdjuster, ToneOptions};

/// Default frame width in pixels.
pub const DEFAULT_TARGET_WIDTH: u32 = 800;
/// Default frame height in pixels.
pub const DEFAULT_TARGET_HEIGHT: u32 = 480;

/// High-level preparation builder for the photo frame.
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`prepare()`](Self::prepare) takes `&self` so one preparer can be shared
///   across images and threads
///
/// # Example
///
/// ```
/// use eink_photo::{FramePreparer, Palette};
/// use image::{Rgb, RgbImage};
///
/// let preparer = FramePreparer::new(Palette::default_eink()).target(40, 24);
///
/// let photo = RgbImage::from_pixel(60, 40, Rgb([200, 120, 80]));
/// let result = preparer.prepare(&photo, &[]).unwrap();
///
/// assert_eq!(result.width(), 40);
/// assert_eq!(result.height(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct FramePreparer {
    palette: Palette,
    target_width: u32,
    target_height: u32,
    tone: ToneOptions,
    face_margin: f64,
}

impl FramePreparer {
    /// Create a preparer for an 800x480 frame with default tone options.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
            tone: ToneOptions::default(),
            face_margin: DEFAULT_FACE_MARGIN,
        }
    }

    /// Set the output size.
    #[inline]
    pub fn target(mut self, width: u32, height: u32) -> Self {
        self.target_width = width;
        self.target_height = height;
        self
    }

    /// Set tone adjustment options.
    #[inline]
    pub fn tone(mut self, options: ToneOptions) -> Self {
        self.tone = options;
        self
    }

    /// Set the fraction by which detected faces are padded before cropping.
    #[inline]
    pub fn face_margin(mut self, margin: f64) -> Self {
        self.face_margin = margin;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    /// Crop, adjust and dither an oriented RGB image.
    ///
    /// Applies the full pipeline:
    /// 1. Smart crop around `faces` and resample to the target size
    /// 2. Tone curve, saturation boost, local contrast
    /// 3. Floyd-Steinberg dithering to the palette
    ///
    /// The same input always produces the same output.
    pub fn prepare(
        &self,
        image: &RgbImage,
        faces: &[FaceBox],
    ) -> Result<DitheredImage, PrepareError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(PrepareError::InvalidTarget {
                width: self.target_width,
                height: self.target_height,
            });
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(PrepareError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }

        // 1. Crop
        let cropped = SmartCrop::new(self.target_width, self.target_height)
            .margin(self.face_margin)
            .crop(image, faces);

        // 2. Tone
        let adjusted = ToneAdjuster::new(self.tone.clone()).adjust(&cropped);

        // 3. Dither
        let indices = FloydSteinberg.dither(&adjusted, &self.palette);

        Ok(DitheredImage::new(
            indices,
            self.target_width,
            self.target_height,
            self.palette.clone(),
        ))
    }
}
