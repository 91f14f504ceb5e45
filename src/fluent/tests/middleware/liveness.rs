//! Tests for the liveness probe

use super::super::{create_test_router, get_body_string, get_request};
use crate::{Config, FluentRouter, HttpMiddleware};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::{Service, ServiceExt};

#[tokio::test]
async fn test_liveness_answers_for_any_host() {
    let app = create_test_router(None);

    for host in ["example.com", "unknown.org", "old-example.com", "10.0.0.7:3000"] {
        let response = app
            .clone()
            .oneshot(get_request(host, "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "host {host}");
        assert_eq!(get_body_string(response).await, "OK\n");
    }
}

#[tokio::test]
async fn test_liveness_without_host_header() {
    let app = create_test_router(None);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_liveness_default_route() {
    let config = Config::default().with_included_middlewares(vec![HttpMiddleware::Liveness]);

    let mut app = FluentRouter::without_state(config)
        .unwrap()
        .setup_multi_domain()
        .unwrap()
        .setup_liveness()
        .into_inner();

    let response = app
        .call(Request::builder().uri("/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Everything else goes through host resolution and finds no table.
    let response = app
        .call(Request::builder().uri("/other").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
