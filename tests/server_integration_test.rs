//! Server integration tests that run the production setup.
//!
//! These tests start a real TCP server from `create_app_state`, with a
//! file-backed record store, and talk to it over HTTP.

mod common;

use std::path::Path;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use common::fixtures;
use inkframe::models::AppConfig;
use inkframe::server::{build_router, create_app_state};

/// A running server and the base URL it issues links for
struct RunningServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl RunningServer {
    /// Start a server on an available port, storing everything under `data_dir`
    async fn start(data_dir: &Path) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let mut config = AppConfig::default();
        config.storage.data_dir = data_dir.to_path_buf();
        config.storage.metadata_file = Some(data_dir.join("images.json"));
        config.frame.width = 80;
        config.frame.height = 48;
        config.frame.palette_path = data_dir.join("missing-palette.json");
        config.server.public_url = base_url.clone();
        config.server.signing_secret = Some("integration-secret".to_string());

        let state = create_app_state(config)
            .await
            .expect("Failed to create app state");
        let app = build_router(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn stop(self) {
        self.handle.abort();
    }
}

async fn upload_png(client: &reqwest::Client, server: &RunningServer, png: Vec<u8>) -> String {
    let upload: serde_json::Value = client
        .get(server.url("/api/upload-url?ext=png"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .put(upload["upload_url"].as_str().unwrap())
        .body(png)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let processed: serde_json::Value = response.json().await.unwrap();
    assert_eq!(processed["message"], "Processed");
    processed["image_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_over_tcp() {
    let data_dir = TempDir::new().unwrap();
    let server = RunningServer::start(data_dir.path()).await;

    let response = reqwest::get(server.url("/health")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
    server.stop();
}

#[tokio::test]
async fn test_upload_is_persisted_across_restart() {
    let data_dir = TempDir::new().unwrap();
    let client = reqwest::Client::new();

    let first = RunningServer::start(data_dir.path()).await;
    let image_id = upload_png(&client, &first, fixtures::gradient_png(160, 100)).await;
    first.stop();

    assert!(data_dir.path().join("images.json").exists());
    assert!(data_dir.path().join("photos/dithered").is_dir());

    let second = RunningServer::start(data_dir.path()).await;
    let random: serde_json::Value = client
        .get(second.url("/api/random-image?metadata=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(random["image_id"], image_id.as_str());
    assert_eq!(random["metadata"]["show_count"], 1);

    let image = client
        .get(random["image_url"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(image.status(), 200);
    assert_eq!(
        image
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    second.stop();
}

#[tokio::test]
async fn test_signed_url_outlives_the_server_that_issued_it() {
    let data_dir = TempDir::new().unwrap();
    let client = reqwest::Client::new();

    let first = RunningServer::start(data_dir.path()).await;
    upload_png(&client, &first, fixtures::solid_png(120, 90, [200, 40, 40])).await;
    let random: serde_json::Value = client
        .get(first.url("/api/random-image"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let issued = random["image_url"].as_str().unwrap().to_string();
    let path = issued.strip_prefix(&first.base_url).unwrap().to_string();
    first.stop();

    // Same signing secret, new process and port
    let second = RunningServer::start(data_dir.path()).await;
    let response = client.get(second.url(&path)).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let tampered = path.replace("signature=", "signature=00");
    let response = client.get(second.url(&tampered)).send().await.unwrap();
    assert_eq!(response.status(), 403);
    second.stop();
}
