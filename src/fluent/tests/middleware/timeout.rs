//! Tests for request timeout middleware setup

use crate::{Config, FluentRouter};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use std::time::Duration;
use tower::Service;

fn timed_router(timeout: Duration) -> Router {
    let config = Config::default()
        .with_request_timeout(timeout)
        .with_domain("example.com", "main")
        .with_common_table("common");

    FluentRouter::without_state(config)
        .unwrap()
        .table(
            "main",
            Router::new().route(
                "/fast",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    "Fast response"
                }),
            ),
        )
        .table(
            "common",
            Router::new().route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    "This should timeout"
                }),
            ),
        )
        .setup_multi_domain()
        .unwrap()
        .setup_timeout()
        .into_inner()
}

fn request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", "example.com")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_slow_handler_in_common_table_times_out() {
    let mut app = timed_router(Duration::from_millis(100));

    let response = app.call(request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_fast_handler_completes() {
    let mut app = timed_router(Duration::from_millis(200));

    let response = app.call(request("/fast")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Fast response");
}

#[tokio::test]
async fn test_no_timeout_configured() {
    let config = Config::default().with_domain("example.com", "main");
    assert!(config.http.request_timeout.is_none());

    let mut app = FluentRouter::without_state(config)
        .unwrap()
        .table(
            "main",
            Router::new().route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    "done"
                }),
            ),
        )
        .setup_multi_domain()
        .unwrap()
        .setup_timeout()
        .into_inner();

    let response = app.call(request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
