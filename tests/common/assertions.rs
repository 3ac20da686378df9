//! Assertion helpers for tests.

use axum::http::StatusCode;
use eink_photo::Palette;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    // Check Content-Type header
    let content_type = response
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    assert_eq!(
        content_type,
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert JSON response has expected status field
pub fn assert_json_status(response: &TestResponse, expected_status: u16) {
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected_status as u64),
        "Expected JSON status {}, got {:?}. Full response: {}",
        expected_status,
        json["status"],
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Assert a processing response with the given message
pub fn assert_process_message(response: &TestResponse, message: &str) {
    assert_ok(response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["message"], message, "Full response: {json}");
}

/// Assert PNG bytes decode to `size` with every pixel in `palette`
pub fn assert_palette_png(png: &[u8], size: (u32, u32), palette: &Palette) {
    let image = image::load_from_memory(png)
        .expect("Dithered artifact should decode")
        .to_rgb8();
    assert_eq!(image.dimensions(), size);

    let stray = image.pixels().find(|p| !palette.contains(p.0));
    assert!(stray.is_none(), "Pixel {stray:?} is not a palette color");
}
