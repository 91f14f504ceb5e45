//! Request handling middleware: payload limits and request IDs.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {
    crate::utils::{RequestIdGenerator, X_REQUEST_ID},
    axum::extract::DefaultBodyLimit,
    http::HeaderName,
    tower_http::{
        limit::RequestBodyLimitLayer,
        request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    },
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up maximum request payload size limits.
    ///
    /// Rejects requests with bodies larger than the configured limit with
    /// a `413 Payload Too Large` response. The limit applies before route
    /// tables see the body, so it holds whichever table answers.
    ///
    /// ```toml
    /// [http]
    /// max_payload_size_bytes = "1MiB"  # Supports KiB, MiB, GiB
    /// ```
    ///
    /// 32 KiB if not configured.
    #[must_use]
    pub fn setup_max_payload_size(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::MaxPayloadSize) {
            return self;
        }

        self.inner =
            self.inner
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(
                    self.config.http.max_payload_size_bytes.as_u64() as usize,
                ));
        self
    }

    /// Sets up request ID generation and propagation.
    ///
    /// Keeps an incoming `x-request-id` or generates a UUIDv7, and copies it
    /// to the response. Redirect and domain-not-found responses carry it too.
    #[must_use]
    pub fn setup_request_id(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::RequestId) {
            return self;
        }

        // Propagation must run inside the layer that sets the header.
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);
        self.inner = self
            .inner
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, RequestIdGenerator));
        self
    }
}
