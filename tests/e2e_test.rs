//! End-to-end test against a running gateway with a real provider token.
//!
//! Requires a live deployment:
//!   GATEWAY_URL=http://localhost:3000 cargo test --test e2e_test -- --ignored

use base64::Engine;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

fn gateway_url() -> String {
    std::env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn test_image_data_uri() -> String {
    let img = RgbImage::from_pixel(16, 16, image::Rgb([120, 80, 200]));
    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut png, ImageFormat::Png)
        .expect("encode test image");
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png.into_inner())
    )
}

#[tokio::test]
#[ignore] // Run with: cargo test --test e2e_test -- --ignored
async fn enhance_round_trip() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/enhance", gateway_url()))
        .json(&serde_json::json!({
            "imageBase64": test_image_data_uri(),
            "scale": 2
        }))
        .send()
        .await
        .expect("gateway reachable");

    assert!(
        response.status().is_success(),
        "enhance failed: {}",
        response.status()
    );

    let body: serde_json::Value = response.json().await.expect("json envelope");
    assert_eq!(body["success"], serde_json::json!(true));
    let image = body["image"].as_str().expect("image field");
    assert!(image.starts_with("data:image/"));
}

#[tokio::test]
#[ignore]
async fn palette_round_trip() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/palette", gateway_url()))
        .json(&serde_json::json!({
            "imageBase64": test_image_data_uri(),
            "numColors": 4
        }))
        .send()
        .await
        .expect("gateway reachable");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("json envelope");
    assert_eq!(body["success"], serde_json::json!(true));
    assert!(!body["colors"].as_array().expect("colors array").is_empty());
}
