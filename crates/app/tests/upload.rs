//! Integration tests for photo upload

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use tandem::daemon::storage::MAX_PHOTO_BYTES;

fn upload_request(token: Option<&str>, content_type: &str, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::post("/api/upload").header(header::CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_upload_returns_a_public_url() {
    let app = common::setup().await;
    let neha = app.login("neha@couple.app").await;

    let (content_type, body) = common::multipart_body("photo", "our trip.jpg", b"\xff\xd8\xff\xe0");
    let (status, response) = app
        .request(upload_request(Some(&neha), &content_type, body))
        .await;
    assert_eq!(status, StatusCode::OK, "{response}");

    let url = response["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"), "{url}");
    assert!(url.ends_with("-our_trip.jpg"), "{url}");

    let key = url.trim_start_matches("/uploads/");
    let stored = app.state.photos().get_photo(key).await.unwrap().unwrap();
    assert_eq!(&stored[..], b"\xff\xd8\xff\xe0");
}

#[tokio::test]
async fn test_upload_without_a_photo_field() {
    let app = common::setup().await;
    let neha = app.login("neha@couple.app").await;

    let (content_type, body) = common::multipart_body("document", "trip.jpg", b"jpeg");
    let (status, response) = app
        .request(upload_request(Some(&neha), &content_type, body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let app = common::setup().await;
    let neha = app.login("neha@couple.app").await;

    for name in ["notes.txt", "script.svg", "no-extension"] {
        let (content_type, body) = common::multipart_body("photo", name, b"data");
        let (status, response) = app
            .request(upload_request(Some(&neha), &content_type, body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{name} was accepted");
        assert!(response["error"].is_string());
    }
}

#[tokio::test]
async fn test_upload_rejects_oversized_photos() {
    let app = common::setup().await;
    let neha = app.login("neha@couple.app").await;

    let data = vec![0u8; MAX_PHOTO_BYTES + 1];
    let (content_type, body) = common::multipart_body("photo", "huge.png", &data);
    let (status, _) = app
        .request(upload_request(Some(&neha), &content_type, body))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let data = vec![0u8; MAX_PHOTO_BYTES];
    let (content_type, body) = common::multipart_body("photo", "exact.png", &data);
    let (status, _) = app
        .request(upload_request(Some(&neha), &content_type, body))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_requires_a_token() {
    let app = common::setup().await;

    let (content_type, body) = common::multipart_body("photo", "trip.jpg", b"jpeg");
    let (status, response) = app.request(upload_request(None, &content_type, body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["error"], "No token provided");
}
