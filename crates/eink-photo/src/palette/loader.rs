//! Palette file loading with a built-in fallback.
//!
//! Palette files are JSON documents of the form
//! `{ "palette": [[r, g, b], ...] }`. Loading never fails: any problem with
//! the file results in [`Palette::default_eink`], and the reason is kept in
//! [`PaletteOrigin::Default`] so callers can report it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::palette::{Palette, MAX_PALETTE_SIZE};

/// Where the active palette came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteOrigin {
    /// Loaded from the given palette file
    File(PathBuf),
    /// Built-in default, with the reason the file was not used
    Default(FallbackReason),
}

/// Reason a palette file was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No palette file at the configured location
    Missing,
    /// File exists but could not be read
    Unreadable(String),
    /// File is not a JSON document of the expected shape
    Malformed(String),
    /// Document parsed but contained no usable colors
    NoValidEntries,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Missing => write!(f, "palette file not found"),
            FallbackReason::Unreadable(e) => write!(f, "palette file unreadable: {e}"),
            FallbackReason::Malformed(e) => write!(f, "palette file malformed: {e}"),
            FallbackReason::NoValidEntries => write!(f, "palette file has no valid colors"),
        }
    }
}

/// A resolved palette together with its origin.
#[derive(Debug, Clone)]
pub struct PaletteLoad {
    pub palette: Palette,
    pub origin: PaletteOrigin,
}

impl PaletteLoad {
    fn fallback(reason: FallbackReason) -> Self {
        Self {
            palette: Palette::default_eink(),
            origin: PaletteOrigin::Default(reason),
        }
    }

    /// Whether the built-in default is in use.
    pub fn is_default(&self) -> bool {
        matches!(self.origin, PaletteOrigin::Default(_))
    }
}

#[derive(Deserialize)]
struct PaletteDocument {
    palette: Vec<Value>,
}

/// Load the palette at `path`, falling back to the built-in default.
///
/// A missing file is expected (most deployments use the default) and is
/// logged at debug level; every other failure is logged as a warning.
pub fn load_palette(path: &Path) -> PaletteLoad {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No palette file, using default palette");
            return PaletteLoad::fallback(FallbackReason::Missing);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read palette, using default");
            return PaletteLoad::fallback(FallbackReason::Unreadable(e.to_string()));
        }
    };

    match parse_palette(&content) {
        Ok(palette) => {
            tracing::info!(path = %path.display(), colors = palette.len(), "Loaded palette");
            PaletteLoad {
                palette,
                origin: PaletteOrigin::File(path.to_path_buf()),
            }
        }
        Err(reason) => {
            tracing::warn!(path = %path.display(), %reason, "Invalid palette, using default");
            PaletteLoad::fallback(reason)
        }
    }
}

/// Parse a palette document, dropping entries that are not RGB triples.
pub fn parse_palette(content: &str) -> Result<Palette, FallbackReason> {
    let document: PaletteDocument =
        serde_json::from_str(content).map_err(|e| FallbackReason::Malformed(e.to_string()))?;

    let mut colors: Vec<[u8; 3]> = Vec::new();
    for (index, entry) in document.palette.iter().enumerate() {
        let Some(color) = parse_entry(entry) else {
            tracing::warn!(index, entry = %entry, "Dropping palette entry that is not an RGB triple");
            continue;
        };
        if colors.contains(&color) {
            tracing::warn!(index, ?color, "Dropping duplicate palette entry");
            continue;
        }
        if colors.len() == MAX_PALETTE_SIZE {
            tracing::warn!(max = MAX_PALETTE_SIZE, "Palette truncated to maximum size");
            break;
        }
        colors.push(color);
    }

    Palette::new(&colors).map_err(|_| FallbackReason::NoValidEntries)
}

/// An entry must be an array of exactly three integer-like values in 0..=255.
fn parse_entry(entry: &Value) -> Option<[u8; 3]> {
    let values = entry.as_array()?;
    if values.len() != 3 {
        return None;
    }
    let mut color = [0u8; 3];
    for (channel, value) in color.iter_mut().zip(values) {
        *channel = parse_channel(value)?;
    }
    Some(color)
}

fn parse_channel(value: &Value) -> Option<u8> {
    if let Some(n) = value.as_u64() {
        return u8::try_from(n).ok();
    }
    // Floats like 180.0 are accepted; 180.5 is not an integer
    let f = value.as_f64()?;
    if f.fract() == 0.0 && (0.0..=255.0).contains(&f) {
        Some(f as u8)
    } else {
        None
    }
}
