//! Core FluentRouter struct and initialization methods.

use {
    crate::{Config, HttpMiddleware, Result, RouteTable, RouteTables},
    axum::Router,
    tokio::sync::mpsc,
};

/// Fluent builder for a multi-domain `axum::Router` with configuration-based
/// middleware setup.
///
/// Application routes are registered as named route tables with
/// [`FluentRouter::table`]. The `[multi_domain]` configuration maps each
/// registrable domain to one of them; [`FluentRouter::setup_middleware`]
/// installs the multi-domain layer that picks the tables per request, and
/// the usual request-id, logging, timeout and panic layers around it.
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use axum_multidomain::{Config, FluentRouter};
///
/// # async fn example() -> axum_multidomain::Result<()> {
/// let config = Config::default()
///     .with_domain("example.com", "main")
///     .with_domain("example.co.uk", "uk")
///     .with_common_table("common");
///
/// FluentRouter::without_state(config)?
///     .table("main", Router::new().route("/", get(|| async { "main" })))
///     .table("uk", Router::new().route("/", get(|| async { "uk" })))
///     .table("common", Router::new().route("/about", get(|| async { "about" })))
///     .setup_middleware()?
///     .start()
///     .await
/// # }
/// ```
pub struct FluentRouter<State = ()> {
    pub(crate) config: Config,
    pub(crate) state: State,
    pub(crate) tables: RouteTables,
    pub(crate) inner: Router<State>,
    pub(crate) multi_domain_installed: bool,
    pub(crate) panic_channel: Option<mpsc::Sender<String>>,
}

impl FluentRouter {
    /// Creates a new `FluentRouter` without application state.
    pub fn without_state(config: Config) -> Result<FluentRouter<()>> {
        FluentRouter::<()>::with_state(config, ())
    }
}

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Creates a new `FluentRouter` with the provided configuration and state.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn with_state<S: Clone + Send + Sync + 'static>(
        config: Config,
        state: S,
    ) -> Result<FluentRouter<S>> {
        config.validate()?;

        Ok(FluentRouter {
            config,
            state,
            tables: RouteTables::new(),
            inner: Router::new(),
            multi_domain_installed: false,
            panic_channel: None,
        })
    }

    /// Returns the configuration the router was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers `router` as the route table called `name`.
    ///
    /// The router receives the application state now, so handlers can use
    /// `State<S>` extractors. Registering a name twice replaces the first
    /// table. Tables must be registered before the multi-domain layer is
    /// installed; later registrations are ignored with a warning.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>, router: Router<State>) -> Self {
        let name = name.into();
        if self.multi_domain_installed {
            tracing::warn!(
                table = %name,
                "Route table registered after multi-domain routing was installed; ignoring it"
            );
            return self;
        }

        let table = RouteTable::new(name, router.with_state(self.state.clone()));
        if let Some(previous) = self.tables.insert(table) {
            tracing::warn!(table = %previous.name(), "Route table registered twice; replacing it");
        }
        self
    }

    /// Names of the registered route tables waiting to be installed.
    ///
    /// Empty once [`setup_multi_domain`](Self::setup_multi_domain) has moved
    /// the tables into the multi-domain layer.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.names()
    }

    /// Helper method to check if a middleware is enabled in the configuration.
    /// Returns true if no middleware config is specified (all enabled by default),
    /// or if the middleware is explicitly enabled/not excluded.
    pub(crate) fn is_middleware_enabled(&self, middleware: HttpMiddleware) -> bool {
        self.config
            .http
            .middleware
            .as_ref()
            .map(|config| config.is_enabled(middleware))
            .unwrap_or(true)
    }

    /// Sets a notification channel for panic messages.
    ///
    /// Panics caught by the panic handler middleware are sent to this
    /// channel, for alerting or tests.
    ///
    /// ```rust,no_run
    /// # use axum_multidomain::{Config, FluentRouter};
    /// # async fn example() -> axum_multidomain::Result<()> {
    /// let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    ///
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .with_panic_notification_channel(tx);
    ///
    /// tokio::spawn(async move {
    ///     while let Some(panic_msg) = rx.recv().await {
    ///         eprintln!("Panic caught: {}", panic_msg);
    ///     }
    /// });
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_panic_notification_channel(self, ch: mpsc::Sender<String>) -> Self {
        Self {
            panic_channel: Some(ch),
            ..self
        }
    }
}
