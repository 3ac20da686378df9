use async_trait::async_trait;
use eink_photo::FaceBox;
use serde::Deserialize;
use std::time::Duration;

use crate::error::FaceDetectionError;

/// Source of face bounding boxes for smart cropping
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Detect faces in the raw upload bytes
    async fn detect(&self, image: &[u8]) -> Result<Vec<FaceBox>, FaceDetectionError>;
}

/// Detector that never finds faces
pub struct NoFaceDetector;

#[async_trait]
impl FaceDetector for NoFaceDetector {
    async fn detect(&self, _image: &[u8]) -> Result<Vec<FaceBox>, FaceDetectionError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    faces: Vec<FaceBox>,
}

/// Client for a face detection service
///
/// POSTs the image bytes to `endpoint` and expects
/// `{"faces": [{"left", "top", "width", "height", "confidence"}]}` with
/// coordinates normalized to [0, 1].
pub struct HttpFaceDetector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFaceDetector {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FaceDetectionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl FaceDetector for HttpFaceDetector {
    async fn detect(&self, image: &[u8]) -> Result<Vec<FaceBox>, FaceDetectionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FaceDetectionError::Status(response.status().as_u16()));
        }

        let body: DetectResponse = response.json().await?;
        tracing::debug!(faces = body.faces.len(), "Face detection complete");
        Ok(body.faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_bytes, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn detector(server: &MockServer) -> HttpFaceDetector {
        HttpFaceDetector::new(format!("{}/detect", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_no_face_detector() {
        assert!(NoFaceDetector.detect(b"anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_detector_parses_faces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .and(body_bytes(b"jpeg bytes".to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "faces": [
                    {"left": 0.1, "top": 0.2, "width": 0.3, "height": 0.4, "confidence": 0.98},
                    {"left": 0.5, "top": 0.5, "width": 0.1, "height": 0.1}
                ]
            })))
            .mount(&server)
            .await;

        let faces = detector(&server).await.detect(b"jpeg bytes").await.unwrap();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].left, 0.1);
        assert_eq!(faces[0].confidence, 0.98);
        assert_eq!(faces[1].height, 0.1);
    }

    #[tokio::test]
    async fn test_http_detector_empty_body_means_no_faces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        assert!(detector(&server).await.detect(b"x").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_detector_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(matches!(
            detector(&server).await.detect(b"x").await,
            Err(FaceDetectionError::Status(503))
        ));
    }

    #[tokio::test]
    async fn test_http_detector_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let detector =
            HttpFaceDetector::new(format!("{}/detect", server.uri()), Duration::from_millis(50))
                .unwrap();
        assert!(matches!(
            detector.detect(b"x").await,
            Err(FaceDetectionError::Request(_))
        ));
    }
}
