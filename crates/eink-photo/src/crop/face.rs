//! Face bounding boxes as reported by a detector.

use serde::{Deserialize, Serialize};

/// A detected face in normalized image coordinates.
///
/// All four geometry fields are fractions of the image size in `[0, 1]`;
/// `confidence` is the detector's score and is carried only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub confidence: f32,
}

impl FaceBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            confidence: 1.0,
        }
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Union of face boxes in pixel space as `(left, top, right, bottom)`.
///
/// Non-finite boxes are skipped; `None` when no usable box remains.
pub(crate) fn union_in_pixels(
    faces: &[FaceBox],
    src_width: u32,
    src_height: u32,
) -> Option<(f64, f64, f64, f64)> {
    let w = src_width as f64;
    let h = src_height as f64;

    faces
        .iter()
        .filter(|face| face.is_finite())
        .map(|face| {
            (
                face.left as f64 * w,
                face.top as f64 * h,
                (face.left as f64 + face.width as f64) * w,
                (face.top as f64 + face.height as f64) * h,
            )
        })
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
}
