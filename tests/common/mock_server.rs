//! Mock face detection service.

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer answering face detection requests
pub struct MockFaceService {
    pub server: MockServer,
}

impl MockFaceService {
    /// Start a new mock face service
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Detection endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/detect", self.server.uri())
    }

    /// Answer every detection request with `faces`
    pub async fn mock_faces(&self, faces: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "faces": faces }))
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Fail every detection request with `status`
    pub async fn mock_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Number of detection requests received
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}
