//! Integration tests for random image selection and signed image fetches.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{assert_ok, assert_png, assert_status, fixtures, TestApp};
use inkframe::models::{ContentFingerprint, ImageId, ImageRecord, Location};
use inkframe::services::{MetadataStore, ObjectStore};
use pretty_assertions::assert_eq;

/// Store a dithered artifact and its record directly
async fn seed_image(app: &TestApp, id: &str) -> ImageRecord {
    let dithered_key = format!("dithered/{id}.png");
    app.put_object(&dithered_key, fixtures::solid_png(80, 48, [255, 255, 255]))
        .await;

    let mut record = ImageRecord::new(
        ImageId::new(id),
        ContentFingerprint::of(id.as_bytes()),
        dithered_key,
        format!("originals/2024/06/01/{id}.jpg"),
        Utc::now(),
    );
    record.taken_at = Some("2024-06-01T12:30:00".to_string());
    record.location = Some(Location {
        lat: 47.5,
        lng: -122.25,
    });
    app.metadata.put_record(record.clone()).await.unwrap();
    record
}

#[tokio::test]
async fn test_random_image_empty_store() {
    let app = TestApp::small();

    let response = app.get("/api/random-image").await;

    assert_status(&response, StatusCode::NOT_FOUND);
    let json: serde_json::Value = response.json();
    assert_eq!(json, serde_json::json!({"error": "No images available"}));
}

#[tokio::test]
async fn test_random_image_returns_signed_url() {
    let app = TestApp::small();
    seed_image(&app, "only").await;

    let response = app.get("/api/random-image").await;

    assert_ok(&response);
    assert_eq!(
        response
            .headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let json: serde_json::Value = response.json();
    assert_eq!(json["image_id"], "only");
    assert!(json.get("metadata").is_none());
    assert!(json["image_url"]
        .as_str()
        .unwrap()
        .starts_with("http://localhost:3000/api/image/dithered/only.png?expires="));
}

#[tokio::test]
async fn test_random_image_updates_show_count() {
    let app = TestApp::small();
    seed_image(&app, "only").await;

    for expected in 1..=3u64 {
        let json: serde_json::Value = app.get("/api/random-image?metadata=true").await.json();
        assert_eq!(json["metadata"]["show_count"], expected);
    }

    let record = app.metadata.get(&ImageId::new("only")).await.unwrap().unwrap();
    assert_eq!(record.show_count, 3);
    assert!(record.last_shown_at.is_some());
}

#[tokio::test]
async fn test_random_image_metadata() {
    let app = TestApp::small();
    seed_image(&app, "only").await;

    let response = app.get("/api/random-image?metadata=true").await;

    assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["metadata"],
        serde_json::json!({
            "taken_at": "2024-06-01T12:30:00",
            "location": {"lat": 47.5, "lng": -122.25},
            "show_count": 1
        })
    );
}

#[tokio::test]
async fn test_random_image_picks_from_all_records() {
    let app = TestApp::small();
    for id in ["a", "b", "c"] {
        seed_image(&app, id).await;
    }

    let mut seen = std::collections::HashSet::new();
    for _ in 0..60 {
        let json: serde_json::Value = app.get("/api/random-image").await.json();
        seen.insert(json["image_id"].as_str().unwrap().to_string());
    }

    assert!(seen.len() >= 2, "Expected variety, saw {seen:?}");
    assert!(seen.iter().all(|id| ["a", "b", "c"].contains(&id.as_str())));
}

#[tokio::test]
async fn test_signed_image_fetch() {
    let app = TestApp::small();
    seed_image(&app, "only").await;

    let json: serde_json::Value = app.get("/api/random-image").await.json();
    let response = app.get_url(json["image_url"].as_str().unwrap()).await;

    assert_png(&response);
    assert_eq!(
        response
            .headers
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("private, max-age=3600")
    );
    let stored = app.objects.get("photos", "dithered/only.png").await.unwrap();
    assert_eq!(response.bytes(), stored.as_slice());
}

#[tokio::test]
async fn test_image_fetch_with_tampered_signature() {
    let app = TestApp::small();
    seed_image(&app, "only").await;

    let json: serde_json::Value = app.get("/api/random-image").await.json();
    let url = json["image_url"].as_str().unwrap();
    let tampered = url.replace("dithered/only.png", "dithered/other.png");

    let response = app.get_url(&tampered).await;
    assert_status(&response, StatusCode::FORBIDDEN);

    let response = app.get("/api/image/dithered/only.png").await;
    assert_status(&response, StatusCode::FORBIDDEN);
}
