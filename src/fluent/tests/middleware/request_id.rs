//! Tests for request ID middleware

use super::super::{create_test_router, get_request, request_with_id};
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = create_test_router(None);

    let response = app
        .oneshot(get_request("example.com", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let id = response
        .headers()
        .get("x-request-id")
        .expect("response should carry a request id")
        .to_str()
        .unwrap();
    let uuid = uuid::Uuid::parse_str(id).expect("generated id should be a UUID");
    assert_eq!(uuid.get_version_num(), 7);
}

#[tokio::test]
async fn test_request_id_is_preserved() {
    let app = create_test_router(None);

    let response = app
        .oneshot(request_with_id("example.com", "/", "custom-id-42"))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "custom-id-42"
    );
}

#[tokio::test]
async fn test_request_id_on_redirect() {
    let app = create_test_router(None);

    let response = app
        .oneshot(request_with_id("old-example.com", "/", "redirect-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "redirect-id"
    );
}

#[tokio::test]
async fn test_request_id_on_unknown_domain() {
    let app = create_test_router(None);

    let response = app
        .oneshot(request_with_id("unknown.org", "/", "missing-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "missing-id"
    );
}

#[tokio::test]
async fn test_distinct_requests_get_distinct_ids() {
    let app = create_test_router(None);

    let first = app
        .clone()
        .oneshot(get_request("example.com", "/"))
        .await
        .unwrap();
    let second = app
        .oneshot(get_request("example.com", "/"))
        .await
        .unwrap();

    assert_ne!(
        first.headers().get("x-request-id").unwrap(),
        second.headers().get("x-request-id").unwrap()
    );
}
