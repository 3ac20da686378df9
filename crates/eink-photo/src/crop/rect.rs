//! Face-aware crop rectangle geometry.

use super::face::{union_in_pixels, FaceBox};

/// Fraction by which the union face box is grown in each dimension.
pub const DEFAULT_FACE_MARGIN: f64 = 0.3;

/// A crop rectangle in fractional pixel coordinates.
///
/// The rectangle always has the target aspect ratio (up to float rounding)
/// and lies entirely inside the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// Compute the crop rectangle for a source image.
    ///
    /// With faces, the rectangle is centered on the union of all face boxes
    /// and grown (uniformly, up to the source bounds) until the union,
    /// expanded by `margin`, fits. Without faces it is the largest centered
    /// rectangle of the target aspect.
    ///
    /// Requires non-zero source and target dimensions.
    pub fn compute(
        src_width: u32,
        src_height: u32,
        faces: &[FaceBox],
        target_width: u32,
        target_height: u32,
        margin: f64,
    ) -> Self {
        let img_w = src_width as f64;
        let img_h = src_height as f64;
        let target_aspect = target_width as f64 / target_height as f64;

        let (center_x, center_y, face_w, face_h) = match union_in_pixels(faces, src_width, src_height)
        {
            Some((left, top, right, bottom)) => (
                (left + right) / 2.0,
                (top + bottom) / 2.0,
                (right - left) * (1.0 + margin),
                (bottom - top) * (1.0 + margin),
            ),
            None => (img_w / 2.0, img_h / 2.0, 0.0, 0.0),
        };

        let (mut crop_w, mut crop_h) = if img_w / img_h > target_aspect {
            (img_h * target_aspect, img_h)
        } else {
            (img_w, img_w / target_aspect)
        };

        if face_w > crop_w || face_h > crop_h {
            let scale = (face_w / crop_w).max(face_h / crop_h);
            crop_w *= scale;
            crop_h *= scale;
        }

        crop_w = crop_w.min(img_w);
        crop_h = crop_h.min(img_h);

        if crop_w / crop_h > target_aspect {
            crop_w = crop_h * target_aspect;
        } else {
            crop_h = crop_w / target_aspect;
        }

        let left = (center_x - crop_w / 2.0).min(img_w - crop_w).max(0.0);
        let top = (center_y - crop_h / 2.0).min(img_h - crop_h).max(0.0);

        Self {
            left,
            top,
            width: crop_w,
            height: crop_h,
        }
    }

    /// Integer pixel bounds `(x, y, width, height)`, flooring each edge.
    ///
    /// The result is clipped to the source and is never empty.
    pub fn to_pixel_bounds(&self, src_width: u32, src_height: u32) -> (u32, u32, u32, u32) {
        let x0 = (self.left.floor().max(0.0) as u32).min(src_width.saturating_sub(1));
        let y0 = (self.top.floor().max(0.0) as u32).min(src_height.saturating_sub(1));
        let x1 = ((self.left + self.width).floor().max(0.0) as u32).min(src_width);
        let y1 = ((self.top + self.height).floor().max(0.0) as u32).min(src_height);
        (x0, y0, x1.saturating_sub(x0).max(1), y1.saturating_sub(y0).max(1))
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}
