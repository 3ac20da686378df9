use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Json as JsonExtractor,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::{ImagePipeline, ProcessOutcome, INPUT_PREFIX};

/// Object-created notification
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ObjectCreatedEvent {
    #[serde(default)]
    pub detail: EventDetail,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventDetail {
    #[serde(default)]
    pub bucket: Option<BucketRef>,
    #[serde(default)]
    pub object: Option<ObjectRef>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BucketRef {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ObjectRef {
    pub key: Option<String>,
}

impl ObjectCreatedEvent {
    fn target(&self) -> Option<(&str, &str)> {
        let bucket = self.detail.bucket.as_ref()?.name.as_deref()?;
        let key = self.detail.object.as_ref()?.key.as_deref()?;
        if bucket.is_empty() || key.is_empty() {
            return None;
        }
        Some((bucket, key))
    }
}

/// Result of handling an uploaded object
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

impl ProcessResponse {
    fn ok(message: &str) -> Self {
        Self {
            status: 200,
            message: message.to_string(),
            image_id: None,
        }
    }
}

/// Map a pipeline outcome to the HTTP response
pub fn outcome_response(outcome: ProcessOutcome) -> Result<Json<ProcessResponse>, ApiError> {
    match outcome {
        ProcessOutcome::Processed(record) => Ok(Json(ProcessResponse {
            image_id: Some(record.image_id.to_string()),
            ..ProcessResponse::ok("Processed")
        })),
        ProcessOutcome::Duplicate(_) => Ok(Json(ProcessResponse::ok("Ignored: duplicate"))),
        ProcessOutcome::Unsupported(ext) => Err(ApiError::Unsupported(ext)),
        ProcessOutcome::Oversized { size, max } => Err(ApiError::PayloadTooLarge { size, max }),
        ProcessOutcome::Undecodable(reason) => Err(ApiError::Unprocessable(reason)),
    }
}

/// Handle an object-created event
///
/// Objects under `input/` are run through the image pipeline; other keys
/// are ignored.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = ObjectCreatedEvent,
    responses(
        (status = 200, description = "Processed or ignored", body = ProcessResponse),
        (status = 400, description = "Event without bucket or key"),
        (status = 413, description = "Image exceeds the input size limit"),
        (status = 415, description = "Unsupported file type"),
        (status = 422, description = "Image could not be decoded"),
    ),
    tag = "Pipeline"
)]
pub async fn handle_event(
    State(pipeline): State<Arc<ImagePipeline>>,
    JsonExtractor(event): JsonExtractor<ObjectCreatedEvent>,
) -> Result<Response, ApiError> {
    let Some((bucket, key)) = event.target() else {
        tracing::warn!("Missing bucket or key in event");
        return Err(ApiError::BadRequest("Invalid event".to_string()));
    };

    if !key.starts_with(INPUT_PREFIX) {
        tracing::info!(key, "Ignoring non-input key");
        return Ok(Json(ProcessResponse::ok("Ignored")).into_response());
    }

    let outcome = pipeline.process(bucket, key).await?;
    Ok(outcome_response(outcome)?.into_response())
}
