use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{AppConfig, Location};
use crate::services::{pick_weighted, MetadataStore, UrlSigner};

use super::upload::signed_url;

#[derive(Debug, Deserialize)]
pub struct RandomImageQuery {
    /// "true" to include capture metadata
    #[serde(default)]
    pub metadata: Option<String>,
}

impl RandomImageQuery {
    fn include_metadata(&self) -> bool {
        self.metadata
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

/// Capture metadata of the chosen image
#[derive(Debug, Serialize, ToSchema)]
pub struct ImageMetadata {
    pub taken_at: Option<String>,
    pub location: Option<Location>,
    /// Times shown, including this one
    pub show_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RandomImageResponse {
    /// Signed, time-limited URL of the dithered PNG
    pub image_url: String,
    pub image_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

/// Pick an image to show
///
/// Images shown recently are less likely to be picked; images never shown
/// are more likely.
#[utoipa::path(
    get,
    path = "/api/random-image",
    responses(
        (status = 200, description = "Chosen image", body = RandomImageResponse),
        (status = 404, description = "No images available"),
    ),
    params(
        ("metadata" = Option<bool>, Query, description = "Include capture metadata"),
    ),
    tag = "Images"
)]
pub async fn handle_random_image(
    State(config): State<Arc<AppConfig>>,
    State(signer): State<Arc<UrlSigner>>,
    State(metadata): State<Arc<dyn MetadataStore>>,
    Query(query): Query<RandomImageQuery>,
) -> Result<Response, ApiError> {
    let start_key: f64 = rand::thread_rng().gen();
    let candidates = metadata
        .query_candidates(start_key, config.server.candidate_limit)
        .await?;

    let now = Utc::now();
    let chosen = {
        let mut rng = rand::thread_rng();
        pick_weighted(&candidates, now, &mut rng).cloned()
    };
    let Some(chosen) = chosen else {
        tracing::info!("No images available");
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No images available"})),
        )
            .into_response());
    };

    let image_url = signed_url(
        &config,
        &signer,
        "GET",
        "/api/image",
        &chosen.dithered_key,
        config.server.image_url_ttl_secs,
    );

    metadata.increment_show_count(&chosen.image_id, now).await?;
    tracing::info!(
        image_id = %chosen.image_id,
        candidates = candidates.len(),
        "Selected image"
    );

    let response = RandomImageResponse {
        image_url,
        image_id: chosen.image_id.to_string(),
        metadata: query.include_metadata().then(|| ImageMetadata {
            taken_at: chosen.taken_at.clone(),
            location: chosen.location,
            show_count: chosen.show_count + 1,
        }),
    };

    Ok(([(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(response)).into_response())
}
