use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported format: {0}")]
    Unsupported(String),

    #[error("Image too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Unprocessable image: {0}")]
    Unprocessable(String),

    #[error("Invalid or expired signature")]
    Forbidden,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ProcessError> for ApiError {
    fn from(e: ProcessError) -> Self {
        match e {
            ProcessError::Store(e) => ApiError::Store(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Object and metadata store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format not supported by this build: {0}")]
    UnsupportedFormat(String),

    #[error("HEIF decode error: {0}")]
    Heif(String),

    #[error("Empty image")]
    Empty,
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encode error: {0}")]
    Png(String),

    #[error("JPEG encode error: {0}")]
    Jpeg(String),
}

#[derive(Debug, Error)]
pub enum FaceDetectionError {
    #[error("Face detector request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Face detector returned status {0}")]
    Status(u16),
}

/// Failures that end a pipeline invocation
///
/// Skips (duplicate, unsupported, oversized, undecodable) are outcomes,
/// not errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Frame preparation failed: {0}")]
    Prepare(#[from] eink_photo::PrepareError),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unsupported(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
