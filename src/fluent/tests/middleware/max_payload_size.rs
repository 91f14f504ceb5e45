//! Tests for maximum payload size middleware

use super::super::{create_test_router, get_body_string, post_request};
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_payload_within_limit_is_accepted() {
    let app = create_test_router(None);

    let body = "a".repeat(512);
    let response = app
        .oneshot(post_request("example.com", "/echo", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_string(response).await, body);
}

#[tokio::test]
async fn test_payload_over_limit_is_rejected() {
    // The base config limits payloads to 1KiB.
    let app = create_test_router(None);

    let response = app
        .oneshot(post_request("example.com", "/echo", "a".repeat(2048)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_limit_applies_after_fall_through() {
    // `/echo` lives in the common table, so the body is handed back by the
    // domain table before being read.
    let app = create_test_router(None);

    let response = app
        .oneshot(post_request("www.example.co.uk", "/echo", "b".repeat(4096)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
