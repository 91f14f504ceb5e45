//! Tests for middleware configuration (include/exclude)

use super::super::{create_config_with_toml, get_request, with_test_tables};
use crate::{Config, FluentRouter, HttpMiddleware};
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_middleware_config_include() {
    let config = Config::default()
        .with_included_middlewares(vec![HttpMiddleware::RequestId, HttpMiddleware::Logging]);

    let fluent_router = FluentRouter::without_state(config).unwrap();

    assert!(fluent_router.is_middleware_enabled(HttpMiddleware::RequestId));
    assert!(fluent_router.is_middleware_enabled(HttpMiddleware::Logging));

    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::Timeout));
    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::Liveness));
    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::CatchPanic));
}

#[tokio::test]
async fn test_middleware_config_default_enables_everything() {
    let fluent_router = FluentRouter::without_state(Config::default()).unwrap();

    for middleware in [
        HttpMiddleware::MaxPayloadSize,
        HttpMiddleware::RequestId,
        HttpMiddleware::Logging,
        HttpMiddleware::Liveness,
        HttpMiddleware::Timeout,
        HttpMiddleware::CatchPanic,
    ] {
        assert!(fluent_router.is_middleware_enabled(middleware));
    }
}

#[tokio::test]
async fn test_exclude_from_toml_disables_request_id_and_liveness() {
    let config = create_config_with_toml(
        r#"
[http.middleware]
exclude = ["request-id", "liveness"]
"#,
    );

    let app = with_test_tables(FluentRouter::without_state(config).unwrap())
        .setup_middleware()
        .unwrap()
        .into_inner();

    let response = app
        .clone()
        .oneshot(get_request("example.com", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_none());

    // Without the liveness route the probe path reaches host resolution.
    let response = app
        .oneshot(get_request("unknown.org", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_include_list_still_routes_by_host() {
    let config = create_config_with_toml(
        r#"
[http.middleware]
include = []
"#,
    );

    let app = with_test_tables(FluentRouter::without_state(config).unwrap())
        .setup_middleware()
        .unwrap()
        .into_inner();

    let response = app
        .clone()
        .oneshot(get_request("example.co.uk", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("unknown.org", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
