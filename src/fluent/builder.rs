//! Orchestration: setup_middleware(), start(), layer() and into_inner().

use super::router::FluentRouter;
use crate::Result;

use {
    axum::{Router, body::Body, routing::Route},
    http::Request,
    std::{convert::Infallible, env, net::SocketAddr, sync::Arc, time::Duration},
    tokio::{signal, sync::Notify},
    tower::{Layer, Service},
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Installs multi-domain routing and all standard middleware layers in
    /// the correct order.
    ///
    /// # Middleware Order
    ///
    /// The last layer added is the outermost layer and executes first on
    /// incoming requests. From innermost to outermost:
    ///
    /// 1. **Route dispatcher** - runs the request through the resolved tables
    /// 2. **Multi-domain** - redirect, subdomain parameters, table resolution
    /// 3. **Max payload size** - limit body size
    /// 4. **Logging** - one span per request
    /// 5. **Timeout** - optional
    /// 6. **Request ID** - generate/extract ID early
    /// 7. **Liveness** - answered for every host
    /// 8. **Panic catching** - catch all panics from inner layers
    ///
    /// Everything except the multi-domain layer can be switched off with
    /// `[http.middleware] exclude = [...]`.
    ///
    /// For a custom order call the individual `setup_*` methods instead,
    /// innermost first, starting with `setup_multi_domain()`:
    ///
    /// ```rust,no_run
    /// # use axum_multidomain::{Config, FluentRouter, Result};
    /// # fn example() -> Result<()> {
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .setup_multi_domain()?
    ///     .setup_logging()
    ///     .setup_request_id()
    ///     .setup_liveness()
    ///     .setup_catch_panic();
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the multi-domain configuration refers to tables
    /// that were not registered with [`FluentRouter::table`].
    pub fn setup_middleware(self) -> Result<Self> {
        const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
        const VERSION: &str = env!("CARGO_PKG_VERSION");
        tracing::info!("Starting {PACKAGE_NAME} version {VERSION}...");

        let router = self
            .setup_multi_domain()? // 2. Host resolution over the dispatcher (1)
            .setup_max_payload_size() // 3. Body size limits
            .setup_logging() // 4. Request/response logging
            .setup_timeout() // 5. Request timeout (optional)
            .setup_request_id() // 6. Request ID
            .setup_liveness() // 7. Liveness endpoint
            .setup_catch_panic(); // 8. Outermost - panic recovery

        Ok(router)
    }

    /// Starts the HTTP server based on the current configuration.
    ///
    /// On SIGTERM or Ctrl+C the server stops accepting connections and waits
    /// up to `http.shutdown_timeout` for in-flight requests before exiting.
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.http.full_bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Bound to {}", &bind_addr);
        tracing::info!("Waiting for connections");

        let service = self
            .inner
            .with_state(self.state)
            .into_make_service_with_connect_info::<SocketAddr>();

        let shutdown_timeout = self.config.http.shutdown_timeout;
        let signalled = Arc::new(Notify::new());

        let serve_future = axum::serve(listener, service)
            .with_graceful_shutdown(shutdown_signal(shutdown_timeout, signalled.clone()));

        // The grace period only starts once a signal was received.
        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                signalled.notified().await;
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }

    /// Adds a custom Tower middleware layer to the router.
    ///
    /// Layers added after `setup_multi_domain()` see every request before
    /// its host is resolved.
    ///
    /// ```rust,no_run
    /// use tower_http::timeout::TimeoutLayer;
    /// # use axum_multidomain::{Config, FluentRouter};
    /// # use std::time::Duration;
    /// # fn example() -> axum_multidomain::Result<()> {
    ///
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .setup_multi_domain()?
    ///     .layer(TimeoutLayer::with_status_code(
    ///         http::StatusCode::GATEWAY_TIMEOUT,
    ///         Duration::from_secs(5),
    ///     ));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request<Body>> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request<Body>>>::Response: axum::response::IntoResponse + 'static,
        <L::Service as Service<Request<Body>>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request<Body>>>::Future: Send + 'static,
    {
        self.inner = self.inner.layer(layer);
        self
    }

    /// Consumes the `FluentRouter` and returns the underlying `axum::Router`.
    ///
    /// Useful in tests (`tower::ServiceExt::oneshot`) or to serve the router
    /// with a listener of your own.
    pub fn into_inner(self) -> Router<State> {
        self.inner
    }
}

/// Waits for SIGTERM or Ctrl+C, then wakes the grace-period timer in
/// [`FluentRouter::start`] and returns so axum starts draining connections.
///
/// If a signal handler cannot be installed, that signal is never awaited.
async fn shutdown_signal(timeout: Duration, signalled: Arc<Notify>) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::debug!("Ctrl+C signal received"),
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(
        "Shutdown signal received, starting graceful shutdown (timeout: {})",
        humantime::format_duration(timeout)
    );
    signalled.notify_one();
}
