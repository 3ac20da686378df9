//! Test fixtures: encoded images built in memory.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Encode `image` in `format`
pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).expect("Failed to encode fixture");
    out.into_inner()
}

/// Solid-color PNG
pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(&RgbImage::from_pixel(width, height, Rgb(color)), ImageFormat::Png)
}

/// Solid-color JPEG
pub fn solid_jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(&RgbImage::from_pixel(width, height, Rgb(color)), ImageFormat::Jpeg)
}

/// Diagonal color gradient PNG
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 127 / (width + height).max(1)) as u8,
        ])
    });
    encode(&image, ImageFormat::Png)
}
