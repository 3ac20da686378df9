use chrono::{DateTime, Utc};
use eink_photo::{FaceBox, FramePreparer};
use image::RgbImage;
use std::sync::Arc;

use crate::error::ProcessError;
use crate::models::{
    extension_of, ContentFingerprint, FrameSpec, ImageId, ImageRecord, InputFormat,
};
use crate::rendering::{
    decode_image, encode_dithered_png, encode_jpeg, extract_capture_metadata, CaptureMetadata,
    ORIGINAL_JPEG_QUALITY,
};

use super::{DedupCheck, DedupGate, FaceDetector, MetadataStore, ObjectStore};

/// Prefix that uploads land under
pub const INPUT_PREFIX: &str = "input/";

/// What happened to one uploaded object
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Processed(ImageRecord),
    Duplicate(ContentFingerprint),
    Oversized { size: usize, max: usize },
    /// Extension (with dot, lowercase) that is not accepted
    Unsupported(String),
    /// Bytes could not be decoded as an image
    Undecodable(String),
}

/// Encoded outputs for one image
pub struct Artifacts {
    pub dithered_png: Vec<u8>,
    /// JPEG re-encoding of the original, for formats stored as JPEG
    pub original_jpeg: Option<Vec<u8>>,
}

/// Crop, tone and dither `image`, then encode the stored artifacts
pub fn prepare_artifacts(
    preparer: &FramePreparer,
    image: &RgbImage,
    faces: &[FaceBox],
    transcode_original: bool,
) -> Result<Artifacts, ProcessError> {
    let dithered = preparer.prepare(image, faces)?;
    let dithered_png = encode_dithered_png(&dithered)?;
    let original_jpeg = if transcode_original {
        Some(encode_jpeg(image, ORIGINAL_JPEG_QUALITY)?)
    } else {
        None
    };
    Ok(Artifacts {
        dithered_png,
        original_jpeg,
    })
}

/// Key of the dithered artifact for `image_id`
pub fn dithered_key(image_id: &ImageId) -> String {
    format!("dithered/{image_id}.png")
}

/// Key of the stored original, filed by processing date
pub fn original_key(image_id: &ImageId, processed_at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "originals/{}/{image_id}{extension}",
        processed_at.format("%Y/%m/%d")
    )
}

async fn run_blocking<T, F>(f: F) -> Result<T, ProcessError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ProcessError::Task(e.to_string()))
}

/// Turns uploaded objects into dithered artifacts and image records
pub struct ImagePipeline {
    objects: Arc<dyn ObjectStore>,
    metadata: Arc<dyn MetadataStore>,
    faces: Arc<dyn FaceDetector>,
    dedup: DedupGate,
    preparer: Arc<FramePreparer>,
    frame: FrameSpec,
}

impl ImagePipeline {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
        faces: Arc<dyn FaceDetector>,
        preparer: FramePreparer,
        frame: FrameSpec,
    ) -> Self {
        Self {
            dedup: DedupGate::new(metadata.clone()),
            objects,
            metadata,
            faces,
            preparer: Arc::new(preparer),
            frame,
        }
    }

    pub fn preparer(&self) -> &FramePreparer {
        &self.preparer
    }

    /// Process the object at `bucket`/`key`.
    ///
    /// Rejected inputs are deleted and reported as an outcome; only store
    /// and task failures are errors. On success the dithered artifact, the
    /// original and the record are written in that order, then the input is
    /// deleted.
    pub async fn process(&self, bucket: &str, key: &str) -> Result<ProcessOutcome, ProcessError> {
        tracing::info!(bucket, key, "Processing upload");

        let Some(format) = InputFormat::from_key(key) else {
            let extension = extension_of(key);
            tracing::warn!(key, %extension, "Unsupported file type");
            self.discard(bucket, key).await?;
            return Ok(ProcessOutcome::Unsupported(extension));
        };

        let bytes = Arc::new(self.objects.get(bucket, key).await?);
        if !self.frame.accepts_input_size(bytes.len()) {
            tracing::warn!(key, size = bytes.len(), max = self.frame.max_input_bytes, "Image too large");
            self.discard(bucket, key).await?;
            return Ok(ProcessOutcome::Oversized {
                size: bytes.len(),
                max: self.frame.max_input_bytes,
            });
        }

        // Held until this function returns so concurrent uploads of the
        // same bytes see a duplicate
        let claim = match self.dedup.check(&bytes).await? {
            DedupCheck::Duplicate(fingerprint) => {
                tracing::info!(key, hash = %fingerprint, "Duplicate image, skipping");
                self.discard(bucket, key).await?;
                return Ok(ProcessOutcome::Duplicate(fingerprint));
            }
            DedupCheck::New(claim) => claim,
        };

        let decode_input = bytes.clone();
        let decoded = run_blocking(move || {
            decode_image(&decode_input, format).map(|decoded| {
                let capture = extract_capture_metadata(decoded.exif.as_deref(), &decode_input);
                (decoded.image, capture)
            })
        })
        .await?;
        let (image, capture) = match decoded {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to decode image");
                self.discard(bucket, key).await?;
                return Ok(ProcessOutcome::Undecodable(e.to_string()));
            }
        };

        let faces = match self.faces.detect(&bytes).await {
            Ok(faces) => faces,
            Err(e) => {
                tracing::warn!(key, error = %e, "Face detection failed, cropping without faces");
                Vec::new()
            }
        };
        tracing::debug!(
            key,
            width = image.width(),
            height = image.height(),
            faces = faces.len(),
            "Decoded image"
        );

        let preparer = self.preparer.clone();
        let transcode = format.needs_transcode();
        let artifacts =
            run_blocking(move || prepare_artifacts(&preparer, &image, &faces, transcode)).await??;

        let fingerprint = claim.fingerprint().clone();
        let Some(record) = self
            .store_artifacts(bucket, key, fingerprint.clone(), capture, artifacts)
            .await?
        else {
            tracing::info!(key, hash = %fingerprint, "Duplicate image stored meanwhile, skipping");
            self.discard(bucket, key).await?;
            return Ok(ProcessOutcome::Duplicate(fingerprint));
        };
        self.objects.delete(bucket, key).await?;

        tracing::info!(
            key,
            image_id = %record.image_id,
            dithered_key = %record.dithered_key,
            "Processed image"
        );
        Ok(ProcessOutcome::Processed(record))
    }

    /// Write both artifacts and the record.
    ///
    /// Returns `None` when a record for the same content already exists; the
    /// artifacts just written are removed again.
    async fn store_artifacts(
        &self,
        bucket: &str,
        key: &str,
        fingerprint: ContentFingerprint,
        capture: CaptureMetadata,
        artifacts: Artifacts,
    ) -> Result<Option<ImageRecord>, ProcessError> {
        let image_id = ImageId::generate();
        let now = Utc::now();
        let dithered_key = dithered_key(&image_id);

        self.objects
            .put(bucket, &dithered_key, artifacts.dithered_png, "image/png")
            .await?;

        let original_key = match artifacts.original_jpeg {
            Some(jpeg) => {
                let original_key = original_key(&image_id, now, ".jpg");
                self.objects
                    .put(bucket, &original_key, jpeg, "image/jpeg")
                    .await?;
                original_key
            }
            None => {
                let original_key = original_key(&image_id, now, &extension_of(key));
                self.objects.copy(bucket, key, &original_key).await?;
                original_key
            }
        };

        let mut record = ImageRecord::new(image_id, fingerprint, dithered_key, original_key, now);
        record.taken_at = capture.taken_at;
        record.location = capture.location;
        if !self.metadata.put_record_if_new(record.clone()).await? {
            self.objects.delete(bucket, &record.dithered_key).await?;
            self.objects.delete(bucket, &record.original_key).await?;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn discard(&self, bucket: &str, key: &str) -> Result<(), ProcessError> {
        self.objects.delete(bucket, key).await?;
        tracing::info!(bucket, key, "Deleted input file");
        Ok(())
    }
}
