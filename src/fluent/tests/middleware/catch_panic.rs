//! Tests for panic catching middleware setup

use crate::{Config, FluentRouter};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use tower::Service;

fn panicking_router(config: Config) -> FluentRouter {
    FluentRouter::without_state(config)
        .unwrap()
        .table(
            "main",
            Router::new()
                .route(
                    "/panic",
                    get(|| async {
                        panic!("Test panic!");
                        #[allow(unreachable_code)]
                        "This will never be reached"
                    }),
                )
                .route("/normal", get(|| async { "OK" })),
        )
        .setup_multi_domain()
        .unwrap()
}

fn request(host: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", host)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_panic_in_table_handler_is_caught() {
    let config = Config::default().with_domain("example.com", "main");
    let mut app = panicking_router(config).setup_catch_panic().into_inner();

    let response = app.call(request("example.com", "/panic")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; charset=utf-8"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Internal Server Error");
}

#[tokio::test]
async fn test_normal_request_passes_through() {
    let config = Config::default().with_domain("example.com", "main");
    let mut app = panicking_router(config).setup_catch_panic().into_inner();

    let response = app.call(request("example.com", "/normal")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_panic_notification_channel_receives_message() {
    let (tx, mut rx) = tokio::sync::mpsc::channel(10);
    let config = Config::default().with_domain("example.com", "main");

    let mut app = panicking_router(config)
        .with_panic_notification_channel(tx)
        .setup_catch_panic()
        .into_inner();

    let response = app.call(request("example.com", "/panic")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let msg = rx.try_recv().expect("panic message should have been sent");
    assert!(msg.contains("Test panic!"), "unexpected message: {msg}");
}

#[tokio::test]
async fn test_server_keeps_serving_after_panic() {
    let config = Config::default().with_domain("example.com", "main");
    let mut app = panicking_router(config).setup_catch_panic().into_inner();

    for _ in 0..3 {
        let response = app.call(request("example.com", "/panic")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = app.call(request("example.com", "/normal")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
