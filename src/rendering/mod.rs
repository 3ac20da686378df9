//! Codecs and metadata extraction around the eink-photo core.

pub mod calibration;
pub mod capture;
pub mod decode;
pub mod encode;

#[cfg(test)]
pub(crate) mod test_exif;

pub use calibration::{palette_json, render_calibration_chart, CALIBRATION_PATCHES};
pub use capture::{extract_capture_metadata, parse_exif_blob, CaptureMetadata};
pub use decode::{decode_image, DecodedImage};
pub use encode::{encode_dithered_png, encode_jpeg, ORIGINAL_JPEG_QUALITY};
