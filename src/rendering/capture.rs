use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use std::io::Cursor;

use crate::models::Location;

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const TAKEN_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Capture time and place read from EXIF; either may be absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureMetadata {
    /// Local capture time, `YYYY-MM-DDTHH:MM:SS` without a zone
    pub taken_at: Option<String>,
    pub location: Option<Location>,
}

/// Read capture metadata from the decoder's raw EXIF block, or from the
/// upload bytes when the decoder found none.
///
/// Never fails: unreadable or malformed metadata yields empty fields.
pub fn extract_capture_metadata(exif_block: Option<&[u8]>, upload: &[u8]) -> CaptureMetadata {
    let exif = match exif_block {
        Some(block) => Reader::new().read_raw(block.to_vec()).ok(),
        None => Reader::new()
            .read_from_container(&mut Cursor::new(upload))
            .ok(),
    };

    match exif {
        Some(exif) => capture_from_exif(&exif),
        None => CaptureMetadata::default(),
    }
}

/// Parse a raw TIFF-structured EXIF block
pub fn parse_exif_blob(block: &[u8]) -> CaptureMetadata {
    extract_capture_metadata(Some(block), &[])
}

fn capture_from_exif(exif: &Exif) -> CaptureMetadata {
    let taken_at = ascii_field(exif, Tag::DateTimeOriginal)
        .or_else(|| ascii_field(exif, Tag::DateTime))
        .and_then(|raw| match NaiveDateTime::parse_from_str(raw.trim(), EXIF_DATE_FORMAT) {
            Ok(dt) => Some(dt.format(TAKEN_AT_FORMAT).to_string()),
            Err(e) => {
                tracing::debug!(%e, raw = %raw, "Ignoring unparseable EXIF date");
                None
            }
        });

    let lat = gps_coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
    let lng = gps_coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);
    let location = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Location { lat, lng }),
        _ => None,
    };

    CaptureMetadata { taken_at, location }
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(values) => values
            .first()
            .and_then(|v| std::str::from_utf8(v).ok())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// Degrees/minutes/seconds rationals to signed decimal degrees
fn gps_coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let reference = ascii_field(exif, ref_tag)?;
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let Value::Rational(parts) = &field.value else {
        return None;
    };
    if parts.len() < 3 || parts[..3].iter().any(|r| r.denom == 0) {
        return None;
    }

    let decimal = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;
    match reference.trim() {
        "S" | "W" => Some(-decimal),
        _ => Some(decimal),
    }
}
