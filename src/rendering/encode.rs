use eink_photo::DitheredImage;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::io::Cursor;

use crate::error::EncodeError;

/// JPEG quality used when a HEIC original is re-encoded for storage
pub const ORIGINAL_JPEG_QUALITY: u8 = 95;

/// Encode dithered indices as an indexed PNG with the palette as PLTE.
///
/// Bit depth is the smallest that holds every palette index. The result is
/// re-compressed with oxipng; if that fails the plain encoding is returned.
pub fn encode_dithered_png(image: &DitheredImage) -> Result<Vec<u8>, EncodeError> {
    let palette = image.palette();
    let plte: Vec<u8> = palette.colors().iter().flatten().copied().collect();

    let (bit_depth, bits) = match palette.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let packed = if bits == 8 {
        image.indices().to_vec()
    } else {
        pack_nbits(image.indices(), image.width(), bits)
    };

    // Fast settings; oxipng picks filters and compression afterwards
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(plte);
        let mut writer = encoder
            .write_header()
            .map_err(|e| EncodeError::Png(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| EncodeError::Png(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

/// Encode an RGB image as baseline JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(image)
        .map_err(|e| EncodeError::Jpeg(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width.max(1) as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width.max(1) as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
