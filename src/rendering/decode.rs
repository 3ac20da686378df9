use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use std::io::Cursor;

use crate::error::DecodeError;
use crate::models::InputFormat;

/// Decoded upload: oriented RGB pixels plus the raw EXIF block, if any
pub struct DecodedImage {
    pub image: RgbImage,
    pub exif: Option<Vec<u8>>,
}

/// Decode upload bytes and apply the EXIF orientation.
///
/// Alpha is dropped. JPEG, PNG and WebP are sniffed from the content;
/// HEIC/HEIF needs the `heif` feature.
pub fn decode_image(bytes: &[u8], format: InputFormat) -> Result<DecodedImage, DecodeError> {
    let decoded = if format.needs_transcode() {
        decode_heif(bytes)?
    } else {
        decode_with_image_crate(bytes)?
    };

    if decoded.image.width() == 0 || decoded.image.height() == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(decoded)
}

fn decode_with_image_crate(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let mut decoder = reader.into_decoder()?;

    let exif = decoder.exif_metadata().ok().flatten();
    let orientation = decoder.orientation().ok();

    let mut image = DynamicImage::from_decoder(decoder)?;
    if let Some(orientation) = orientation {
        image.apply_orientation(orientation);
    }

    Ok(DecodedImage {
        image: image.to_rgb8(),
        exif,
    })
}

#[cfg(feature = "heif")]
fn decode_heif(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let heif_err = |e: libheif_rs::HeifError| DecodeError::Heif(e.to_string());

    let context = HeifContext::read_from_bytes(bytes).map_err(heif_err)?;
    let handle = context.primary_image_handle().map_err(heif_err)?;

    // libheif applies irot/imir transforms while decoding
    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(heif_err)?;
    let plane = decoded
        .planes()
        .interleaved
        .ok_or_else(|| DecodeError::Heif("no interleaved RGB plane".to_string()))?;

    let (width, height, stride) = (plane.width, plane.height, plane.stride);
    let row_len = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in plane.data.chunks(stride).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }
    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| DecodeError::Heif("short pixel buffer".to_string()))?;

    // HEIF EXIF items start with a 4-byte offset to the TIFF header
    let exif = handle
        .metadata_block_ids(b"Exif")
        .into_iter()
        .next()
        .and_then(|id| handle.metadata(id).ok())
        .and_then(|block| {
            let offset = u32::from_be_bytes(block.get(..4)?.try_into().ok()?) as usize;
            block.get(4 + offset..).map(<[u8]>::to_vec)
        });

    Ok(DecodedImage { image, exif })
}

#[cfg(not(feature = "heif"))]
fn decode_heif(_bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    Err(DecodeError::UnsupportedFormat(
        "HEIC/HEIF (built without the heif feature)".to_string(),
    ))
}
