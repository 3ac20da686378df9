//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use eink_photo::{load_palette, FramePreparer, Palette};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{
    FaceDetector, FsObjectStore, HttpFaceDetector, ImagePipeline, InMemoryMetadataStore,
    MetadataStore, NoFaceDetector, ObjectStore, UrlSigner,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub objects: Arc<dyn ObjectStore>,
    pub metadata: Arc<dyn MetadataStore>,
    pub signer: Arc<UrlSigner>,
    pub pipeline: Arc<ImagePipeline>,
}

/// Load the configured palette; the loader logs where it came from
pub fn load_configured_palette(config: &AppConfig) -> Palette {
    load_palette(&config.resolved_palette_path()).palette
}

/// Create application state from configuration.
///
/// Objects live on the filesystem under `storage.data_dir`; records are
/// kept in memory and mirrored to `storage.metadata_file` when set.
pub async fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let objects: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(&config.storage.data_dir));

    let metadata: Arc<dyn MetadataStore> = match &config.storage.metadata_file {
        Some(path) => Arc::new(
            InMemoryMetadataStore::with_file(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load image records: {e}"))?,
        ),
        None => Arc::new(InMemoryMetadataStore::new()),
    };

    let faces: Arc<dyn FaceDetector> = match &config.faces.endpoint {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Face detection enabled");
            Arc::new(HttpFaceDetector::new(
                endpoint.clone(),
                Duration::from_secs(config.faces.timeout_secs),
            )?)
        }
        None => Arc::new(NoFaceDetector),
    };

    let palette = load_configured_palette(&config);
    Ok(create_app_state_with(config, objects, metadata, faces, palette))
}

/// Create application state from explicit stores and palette.
pub fn create_app_state_with(
    config: AppConfig,
    objects: Arc<dyn ObjectStore>,
    metadata: Arc<dyn MetadataStore>,
    faces: Arc<dyn FaceDetector>,
    palette: Palette,
) -> AppState {
    let signer = match &config.server.signing_secret {
        Some(secret) => UrlSigner::new(secret),
        None => {
            tracing::warn!("No signing secret configured, signed URLs will not survive a restart");
            UrlSigner::with_random_secret()
        }
    };

    let preparer = FramePreparer::new(palette)
        .target(config.frame.width, config.frame.height)
        .tone(config.tone.to_options())
        .face_margin(config.faces.margin);

    let pipeline = ImagePipeline::new(
        objects.clone(),
        metadata.clone(),
        faces,
        preparer,
        config.frame_spec(),
    );

    AppState {
        config: Arc::new(config),
        objects,
        metadata,
        signer: Arc::new(signer),
        pipeline: Arc::new(pipeline),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    // One byte over the limit so oversized uploads reach the pipeline and
    // are rejected there
    let upload_limit = state.config.frame.max_input_bytes.saturating_add(1);

    Router::new()
        .route("/api/events", post(handle_event))
        .route("/api/upload-url", get(handle_upload_url))
        .route(
            "/api/upload/*key",
            put(handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/random-image", get(handle_random_image))
        .route("/api/image/*key", get(handle_image))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_event(
    State(state): State<AppState>,
    event: Json<api::ObjectCreatedEvent>,
) -> Result<Response, ApiError> {
    api::handle_event(State(state.pipeline), event).await
}

async fn handle_upload_url(
    State(state): State<AppState>,
    query: Query<api::upload::UploadUrlQuery>,
) -> Result<Response, ApiError> {
    api::handle_upload_url(State(state.config), State(state.signer), query).await
}

async fn handle_upload(
    State(state): State<AppState>,
    key: Path<String>,
    query: Query<api::SignedQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    api::handle_upload(
        State(state.config),
        State(state.signer),
        State(state.objects),
        State(state.pipeline),
        key,
        query,
        body,
    )
    .await
}

async fn handle_random_image(
    State(state): State<AppState>,
    query: Query<api::random::RandomImageQuery>,
) -> Result<Response, ApiError> {
    api::handle_random_image(
        State(state.config),
        State(state.signer),
        State(state.metadata),
        query,
    )
    .await
}

async fn handle_image(
    State(state): State<AppState>,
    key: Path<String>,
    query: Query<api::SignedQuery>,
) -> Result<Response, ApiError> {
    api::handle_image(
        State(state.config),
        State(state.signer),
        State(state.objects),
        key,
        query,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_configured_palette_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("palette.json");
        std::fs::write(&path, r#"{"palette": [[0, 0, 0], [255, 255, 255]]}"#).unwrap();

        let mut config = AppConfig::default();
        config.frame.palette_path = path;

        let palette = load_configured_palette(&config);
        assert_eq!(palette.colors(), &[[0, 0, 0], [255, 255, 255]]);
    }

    #[test]
    fn test_missing_palette_file_uses_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.frame.palette_path = dir.path().join("missing.json");

        let palette = load_configured_palette(&config);
        assert_eq!(palette.colors(), Palette::default_eink().colors());
    }

    #[tokio::test]
    async fn test_app_state_reads_metadata_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.storage.metadata_file = Some(dir.path().join("images.json"));
        config.frame.palette_path = dir.path().join("missing.json");

        let state = create_app_state(config).await.unwrap();
        let candidates = state.metadata.query_candidates(0.0, 10).await.unwrap();
        assert!(candidates.is_empty());
    }
}
