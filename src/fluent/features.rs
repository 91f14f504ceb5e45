//! Feature middleware: request timeout and liveness probe.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {axum::routing::get, http::StatusCode, tower_http::timeout::TimeoutLayer};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Aborts requests that take longer than the configured duration with a
    /// `408 Request Timeout` response.
    ///
    /// ```toml
    /// [http]
    /// request_timeout = "30s"  # Optional, uses humantime format
    /// ```
    #[must_use]
    pub fn setup_timeout(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Timeout) {
            return self;
        }

        if let Some(timeout) = self.config.http.request_timeout {
            self.inner = self.inner.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ));
        }
        self
    }

    /// Adds the liveness endpoint at `http.liveness_route` (default `/live`).
    ///
    /// The endpoint is a plain route on the outer router, so it answers
    /// `200 OK` for any host, including hosts with no route table and
    /// redirected domains. Call after `setup_multi_domain()`.
    #[must_use]
    pub fn setup_liveness(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Liveness) {
            return self;
        }

        let liveness_route = self.config.http.liveness_route.clone();
        self.inner = self.inner.route(&liveness_route, get(|| async { "OK\n" }));
        self
    }
}
