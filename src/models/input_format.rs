use std::path::Path;

/// Upload formats the pipeline accepts, keyed by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Jpeg,
    Png,
    WebP,
    Heif,
}

impl InputFormat {
    /// Detect the format from an object key's extension (case-insensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        Self::from_extension(&extension_of(key))
    }

    /// `ext` includes the leading dot, lowercase
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".jpg" | ".jpeg" => Some(Self::Jpeg),
            ".png" => Some(Self::Png),
            ".webp" => Some(Self::WebP),
            ".heic" | ".heif" => Some(Self::Heif),
            _ => None,
        }
    }

    /// Formats decoded through libheif rather than the image crate; their
    /// originals are stored as JPEG
    pub fn needs_transcode(self) -> bool {
        matches!(self, Self::Heif)
    }
}

/// Lowercased extension of a key including the dot, or an empty string
pub fn extension_of(key: &str) -> String {
    Path::new(key)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Content type for a stored object, derived from its extension
pub fn content_type_for_key(key: &str) -> &'static str {
    match extension_of(key).as_str() {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".webp" => "image/webp",
        ".heic" => "image/heic",
        ".heif" => "image/heif",
        ".json" => "application/json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert_eq!(InputFormat::from_key("input/a.jpg"), Some(InputFormat::Jpeg));
        assert_eq!(InputFormat::from_key("input/a.JPEG"), Some(InputFormat::Jpeg));
        assert_eq!(InputFormat::from_key("input/a.png"), Some(InputFormat::Png));
        assert_eq!(InputFormat::from_key("input/a.WebP"), Some(InputFormat::WebP));
        assert_eq!(InputFormat::from_key("input/a.heic"), Some(InputFormat::Heif));
        assert_eq!(InputFormat::from_key("input/a.HEIF"), Some(InputFormat::Heif));
    }

    #[test]
    fn test_unsupported_extensions() {
        assert_eq!(InputFormat::from_key("input/notes.txt"), None);
        assert_eq!(InputFormat::from_key("input/noext"), None);
        assert_eq!(InputFormat::from_key("input/image.gif"), None);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("input/x.TXT"), ".txt");
        assert_eq!(extension_of("input/x"), "");
        assert_eq!(extension_of("input/archive.tar.gz"), ".gz");
    }

    #[test]
    fn test_only_heif_is_transcoded() {
        assert!(InputFormat::Heif.needs_transcode());
        assert!(!InputFormat::Jpeg.needs_transcode());
        assert!(!InputFormat::Png.needs_transcode());
        assert!(!InputFormat::WebP.needs_transcode());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for_key("dithered/a.png"), "image/png");
        assert_eq!(content_type_for_key("originals/2024/01/02/a.jpg"), "image/jpeg");
        assert_eq!(content_type_for_key("x.bin"), "application/octet-stream");
    }
}
