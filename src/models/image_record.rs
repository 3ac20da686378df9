use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::ContentFingerprint;

/// Tag stored with each record for the pipeline revision that produced it
pub const PROCESSING_VERSION: &str = "v1";

/// Image identifier (UUID v4)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capture location in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Metadata for one accepted image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_id: ImageId,
    pub content_hash: ContentFingerprint,
    pub dithered_key: String,
    pub original_key: String,
    pub processing_version: String,
    pub created_at: DateTime<Utc>,
    /// Capture time from EXIF, ISO-8601 without offset
    pub taken_at: Option<String>,
    pub location: Option<Location>,
    pub last_shown_at: Option<DateTime<Utc>>,
    pub show_count: u64,
    /// Ranking key in [0, 1) for random selection
    pub random_sort: f64,
}

impl ImageRecord {
    /// A freshly processed image that has never been shown
    pub fn new(
        image_id: ImageId,
        content_hash: ContentFingerprint,
        dithered_key: String,
        original_key: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        use rand::Rng;
        Self {
            image_id,
            content_hash,
            dithered_key,
            original_key,
            processing_version: PROCESSING_VERSION.to_string(),
            created_at,
            taken_at: None,
            location: None,
            last_shown_at: None,
            show_count: 0,
            random_sort: rand::thread_rng().gen::<f64>(),
        }
    }
}
