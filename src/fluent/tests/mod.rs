//! Test helpers and utilities for FluentRouter tests
//!
//! These tests use `oneshot()` for fast, in-process testing without network I/O.
//! Real listener tests live in the crate's `tests/` directory.
//!
//! ## Available Helpers
//!
//! - Configuration builders: `create_base_config()`, `create_config_with_toml()`
//! - Router builders: `create_test_router()`, `with_test_tables()`
//! - Request helpers: `get_request()`, `post_request()`, `request_with_id()`
//! - Response helpers: `get_body_string()`

use crate::{Config, FluentRouter, SubdomainParams};
use axum::{
    Router,
    body::Body,
    http::Request,
    response::Response,
    routing::{get, post},
};

pub(crate) mod middleware;

// ============================================================================
// Configuration Helpers
// ============================================================================

/// Base TOML configuration for tests: two domains, one redirect, a common
/// table and named subdomain labels.
const BASE_CONFIG_TOML: &str = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
max_payload_size_bytes = "1KiB"
liveness_route = "/health"

[logging]
format = "json"

[multi_domain]
common_table = "common"
default_domain = "example.com"
subdomain_names = ["tenant", "region"]

[multi_domain.domains]
"example.com" = "main"
"example.co.uk" = "uk"

[multi_domain.redirects]
"old-example.com" = "example.com"
"#;

pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse test config TOML")
}

/// Creates the base configuration with additional TOML appended.
///
/// Keys in `additional_toml` must not repeat the base ones.
pub(crate) fn create_config_with_toml(additional_toml: &str) -> Config {
    format!("{BASE_CONFIG_TOML}\n{additional_toml}")
        .parse()
        .expect("Failed to parse test config TOML")
}

// ============================================================================
// Router Helpers
// ============================================================================

/// Registers the `main`, `uk` and `common` tables used by the base config.
///
/// - `/` and `/shared` exist in `main` and `uk` and answer with the table name
/// - `/shared` also exists in `common` (shadowed for resolved domains)
/// - `/about` only exists in `common`
/// - `/echo` (POST) only exists in `common` and echoes the body
/// - `/whoami` in `main` reports the subdomain parameters
pub(crate) fn with_test_tables(router: FluentRouter) -> FluentRouter {
    router
        .table(
            "main",
            Router::new()
                .route("/", get(|| async { "main" }))
                .route("/shared", get(|| async { "main shared" }))
                .route("/whoami", get(whoami_handler)),
        )
        .table(
            "uk",
            Router::new()
                .route("/", get(|| async { "uk" }))
                .route("/shared", get(|| async { "uk shared" })),
        )
        .table(
            "common",
            Router::new()
                .route("/shared", get(|| async { "common shared" }))
                .route("/about", get(|| async { "about" }))
                .route("/echo", post(|body: String| async move { body })),
        )
}

/// Creates a fully set up test router from `config` (or the base config).
pub(crate) fn create_test_router(config: Option<Config>) -> Router {
    let config = config.unwrap_or_else(create_base_config);
    let router = FluentRouter::without_state(config).expect("Failed to create FluentRouter");

    with_test_tables(router)
        .setup_middleware()
        .expect("Failed to setup middleware")
        .into_inner()
}

// ============================================================================
// Request Helpers
// ============================================================================

/// Creates a GET request to `uri` addressed to `host`.
pub(crate) fn get_request(host: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", host)
        .body(Body::empty())
        .unwrap()
}

/// Creates a POST request to `uri` addressed to `host` with `body`.
pub(crate) fn post_request(host: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", host)
        .body(body.into())
        .unwrap()
}

/// Creates a GET request with a custom request ID header.
pub(crate) fn request_with_id(host: &str, uri: &str, request_id: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", host)
        .header("x-request-id", request_id)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Extracts the body from a response as a String.
pub(crate) async fn get_body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Reports subdomain parameters as `name=value` pairs joined by `,`.
pub(crate) async fn whoami_handler(params: SubdomainParams) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}
