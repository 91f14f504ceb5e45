//! Observability middleware: request logging.

use super::router::FluentRouter;
use crate::{HttpMiddleware, utils::X_REQUEST_ID};

use {
    axum::body::Body,
    http::{Request, header},
    tower_http::trace::TraceLayer as TowerHTTPLayer,
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up HTTP request/response logging middleware.
    ///
    /// Every request gets an `http_request` span with method, URI, host and
    /// request ID. Resolution events logged by the multi-domain layer
    /// (redirects, unknown domains, chosen tables) are recorded inside it.
    ///
    /// Log output format is controlled by the `logging.format` configuration.
    #[must_use]
    pub fn setup_logging(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Logging) {
            return self;
        }

        self.inner = self.inner.layer(TowerHTTPLayer::new_for_http().make_span_with(
            |request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                let host = request
                    .headers()
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .or_else(|| request.uri().host())
                    .unwrap_or("");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    host = %host,
                    request_id = %request_id,
                )
            },
        ));
        self
    }
}
