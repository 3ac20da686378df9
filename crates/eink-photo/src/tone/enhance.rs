//! Saturation and local contrast enhancement.

use image::{imageops, RgbImage};

/// Luminance of an RGB pixel using ITU-R 601-2 integer weights.
#[inline]
pub fn luminance(rgb: [u8; 3]) -> u8 {
    let l = 19595 * rgb[0] as u32 + 38470 * rgb[1] as u32 + 7471 * rgb[2] as u32 + 0x8000;
    (l >> 16) as u8
}

#[inline]
fn round_clamp(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn truncate_clamp(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Blend every pixel away from (factor > 1) or toward (factor < 1) its
/// luminance gray. Gray pixels are unchanged for any factor.
///
/// Blended values are clamped, then truncated toward zero.
pub fn boost_saturation(image: &mut RgbImage, factor: f32) {
    if factor == 1.0 {
        return;
    }
    for pixel in image.pixels_mut() {
        let gray = luminance(pixel.0) as f32;
        for channel in pixel.0.iter_mut() {
            *channel = truncate_clamp(gray + factor * (*channel as f32 - gray));
        }
    }
}

/// Unsharp mask.
///
/// Each channel differing from its Gaussian-blurred value by at least
/// `threshold` becomes `orig + diff * percent / 100`; other channels are
/// left alone.
pub fn unsharp_mask(image: &RgbImage, radius: f32, percent: i32, threshold: u8) -> RgbImage {
    if percent == 100 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    let blurred = imageops::blur(image, radius);
    let mut output = image.clone();

    for (out, soft) in output.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let orig = out.0[c] as i32;
            let diff = orig - soft.0[c] as i32;
            if diff.abs() >= threshold as i32 {
                out.0[c] = round_clamp(orig as f32 + diff as f32 * percent as f32 / 100.0);
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_luminance_weights() {
        assert_eq!(luminance([0, 0, 0]), 0);
        assert_eq!(luminance([255, 255, 255]), 255);
        assert_eq!(luminance([255, 0, 0]), 76);
        assert_eq!(luminance([0, 255, 0]), 150);
        assert_eq!(luminance([0, 0, 255]), 29);
    }

    #[test]
    fn test_saturation_keeps_gray() {
        let mut image = RgbImage::from_pixel(3, 3, Rgb([90, 90, 90]));
        boost_saturation(&mut image, 1.15);
        assert!(image.pixels().all(|p| p.0 == [90, 90, 90]));
    }

    #[test]
    fn test_saturation_pushes_away_from_gray() {
        let mut image = RgbImage::from_pixel(1, 1, Rgb([200, 100, 100]));
        let gray = luminance([200, 100, 100]) as f32;
        boost_saturation(&mut image, 1.15);
        let out = image.get_pixel(0, 0).0;
        assert_eq!(out[0], (gray + 1.15 * (200.0 - gray)) as u8);
        assert!(out[0] > 200);
        assert!(out[1] < 100);
    }

    #[test]
    fn test_saturation_truncates_blend() {
        // gray 130: 130 + 1.15 * (100 - 130) = 95.5
        let mut image = RgbImage::from_pixel(1, 1, Rgb([200, 100, 100]));
        boost_saturation(&mut image, 1.15);
        assert_eq!(image.get_pixel(0, 0).0[1], 95);
        assert_eq!(image.get_pixel(0, 0).0[2], 95);
    }

    #[test]
    fn test_saturation_clamps() {
        let mut image = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        boost_saturation(&mut image, 3.0);
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_unsharp_flat_image_unchanged() {
        let image = RgbImage::from_pixel(8, 8, Rgb([120, 60, 200]));
        let out = unsharp_mask(&image, 1.0, 140, 2);
        assert_eq!(out, image);
    }

    #[test]
    fn test_unsharp_increases_edge_contrast() {
        let image = RgbImage::from_fn(10, 4, |x, _| {
            if x < 5 {
                Rgb([80, 80, 80])
            } else {
                Rgb([170, 170, 170])
            }
        });
        let out = unsharp_mask(&image, 1.0, 140, 2);
        assert!(out.get_pixel(4, 1).0[0] < 80);
        assert!(out.get_pixel(5, 1).0[0] > 170);
    }

    #[test]
    fn test_unsharp_high_threshold_is_noop() {
        let image = RgbImage::from_fn(6, 6, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 50]));
        let out = unsharp_mask(&image, 1.0, 140, 255);
        assert_eq!(out, image);
    }
}
