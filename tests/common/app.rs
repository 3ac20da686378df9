//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use eink_photo::Palette;
use inkframe::models::AppConfig;
use inkframe::server::{build_router, create_app_state_with};
use inkframe::services::{
    FaceDetector, FsObjectStore, HttpFaceDetector, InMemoryMetadataStore, NoFaceDetector,
    ObjectStore,
};

pub const PUBLIC_URL: &str = "http://localhost:3000";
pub const BUCKET: &str = "photos";

/// Test application with router and direct access to the stores
pub struct TestApp {
    router: axum::Router,
    pub config: AppConfig,
    pub objects: Arc<FsObjectStore>,
    pub metadata: Arc<InMemoryMetadataStore>,
    _data_dir: TempDir,
}

impl TestApp {
    /// Create a test application with an 800x480 frame and the built-in palette
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test application with a small frame, for faster processing
    pub fn small() -> Self {
        Self::with_config(|config| {
            config.frame.width = 80;
            config.frame.height = 48;
        })
    }

    /// Create a test application after adjusting the default test configuration
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        Self::build(adjust, Arc::new(NoFaceDetector))
    }

    /// Create a test application that asks `endpoint` for faces
    pub fn with_face_service(endpoint: &str) -> Self {
        let detector = HttpFaceDetector::new(endpoint, Duration::from_secs(5))
            .expect("Failed to create face detector");
        Self::build(|_| {}, Arc::new(detector))
    }

    fn build(adjust: impl FnOnce(&mut AppConfig), faces: Arc<dyn FaceDetector>) -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.storage.data_dir = data_dir.path().to_path_buf();
        config.storage.bucket = BUCKET.to_string();
        config.storage.metadata_file = None;
        config.server.public_url = PUBLIC_URL.to_string();
        config.server.signing_secret = Some("test-secret".to_string());
        adjust(&mut config);

        let objects = Arc::new(FsObjectStore::new(data_dir.path()));
        let metadata = Arc::new(InMemoryMetadataStore::new());

        // Create application state using shared server module
        let state = create_app_state_with(
            config.clone(),
            objects.clone(),
            metadata.clone(),
            faces,
            Palette::default_eink(),
        );

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            config,
            objects,
            metadata,
            _data_dir: data_dir,
        }
    }

    /// Place an object in the bucket, as an external uploader would
    pub async fn put_object(&self, key: &str, bytes: Vec<u8>) {
        self.objects
            .put(BUCKET, key, bytes, "application/octet-stream")
            .await
            .expect("Failed to store object");
    }

    /// All keys in the bucket under `prefix`
    pub async fn keys(&self, prefix: &str) -> Vec<String> {
        self.objects.list(BUCKET, prefix).await.expect("Failed to list objects")
    }

    /// Send an object-created event for `key`
    pub async fn notify(&self, key: &str) -> TestResponse {
        let event = serde_json::json!({
            "detail": {"bucket": {"name": BUCKET}, "object": {"key": key}}
        });
        self.post_json("/api/events", &event.to_string()).await
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request for an absolute URL issued by the server
    pub async fn get_url(&self, url: &str) -> TestResponse {
        self.get(path_of(url)).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a PUT request with a raw body
    pub async fn put_bytes(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::put(path)
            .header("Content-Type", "application/octet-stream")
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Path and query of a URL issued with the test public URL
pub fn path_of(url: &str) -> &str {
    url.strip_prefix(PUBLIC_URL)
        .unwrap_or_else(|| panic!("URL {url} does not start with {PUBLIC_URL}"))
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
