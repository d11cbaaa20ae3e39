//! Detection client against a mock inference endpoint.

use std::path::Path;
use std::time::Duration;

use cmm_services::detection::BOX_COLOR;
use cmm_services::{DetectionClient, DetectionConfig, ServiceError};
use image::RgbImage;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(endpoint: String) -> DetectionConfig {
    DetectionConfig {
        endpoint,
        api_key: Some("test-key".to_string()),
        model: Some("https://hub.ultralytics.com/models/steel".to_string()),
        ..DetectionConfig::default()
    }
}

fn write_image(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sections.png");
    RgbImage::new(64, 48).save(&path).unwrap();
    path
}

#[tokio::test]
async fn test_detect_counts_and_annotates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "images": [{
                "results": [
                    {"name": "shs", "confidence": 0.91, "box": {"x1": 4.0, "y1": 5.0, "x2": 20.0, "y2": 21.0}},
                    {"name": "shs", "confidence": 0.88, "box": {"x1": 30.0, "y1": 10.0, "x2": 50.0, "y2": 30.0}}
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path());
    let client = DetectionClient::new(config(server.uri()), Duration::from_secs(5)).unwrap();

    let detection = client.detect(&image).await.unwrap();

    assert_eq!(detection.count, 2);
    assert_eq!(detection.boxes[0].name, "shs");
    assert_eq!(detection.annotated.dimensions(), (64, 48));
    assert_eq!(*detection.annotated.get_pixel(4, 5), BOX_COLOR);
    assert_eq!(*detection.annotated.get_pixel(50, 30), BOX_COLOR);

    let requests = server.received_requests().await.unwrap();
    let body = &requests[0].body;
    for needle in [
        "name=\"file\"",
        "filename=\"image.jpg\"",
        "image/jpeg",
        "name=\"model\"",
        "https://hub.ultralytics.com/models/steel",
        "name=\"imgsz\"",
        "640",
        "name=\"conf\"",
        "name=\"iou\"",
    ] {
        assert!(contains(body, needle.as_bytes()), "multipart body missing {needle}");
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[tokio::test]
async fn test_empty_response_counts_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path());
    let client = DetectionClient::new(config(server.uri()), Duration::from_secs(5)).unwrap();

    let detection = client.detect(&image).await.unwrap();
    assert_eq!(detection.count, 0);
    assert!(detection.boxes.is_empty());
}

#[tokio::test]
async fn test_missing_image_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = DetectionClient::new(config(server.uri()), Duration::from_secs(5)).unwrap();

    let err = client
        .detect(&dir.path().join("missing.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ImageNotFound(_)));
    assert_eq!(err.user_message(), "Image path not found.");
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path());
    let client = DetectionClient::new(config(server.uri()), Duration::from_secs(5)).unwrap();

    match client.detect(&image).await.unwrap_err() {
        ServiceError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path());
    let config = DetectionConfig {
        api_key: None,
        ..config("http://127.0.0.1:9".to_string())
    };
    let client = DetectionClient::new(config, Duration::from_secs(5)).unwrap();

    let err = client.detect(&image).await.unwrap_err();
    assert!(matches!(err, ServiceError::MissingConfig("YOLO_URL_API")));
}
