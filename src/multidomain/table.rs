//! Route tables and their composition.
//!
//! A [`RouteTable`] is a named `axum::Router`. A [`CompositeRouteTable`]
//! chains several of them: a request is offered to each table in order and
//! the first table with a matching route answers it. A table that has no
//! matching route hands the request back untouched (body included) so the
//! next table can try.
//!
//! Composites are built per request from the [`RouteTables`] registry. They
//! only clone the `Arc`-backed routers, so building one costs as much as the
//! number of tables, not the number of routes.

use {
    crate::{Error, MultiDomainConfig, Result},
    axum::{
        Router,
        extract::Request,
        response::{IntoResponse, Response},
    },
    std::{
        collections::HashMap,
        convert::Infallible,
        fmt,
        future::Future,
        pin::Pin,
        sync::{Arc, Mutex},
        task::{Context, Poll},
    },
    tower::{Service, ServiceExt},
};

/// Response extension carrying a request no route in a table matched.
#[derive(Clone)]
struct Unmatched(Arc<Mutex<Option<Request>>>);

impl Unmatched {
    fn new(request: Request) -> Self {
        Self(Arc::new(Mutex::new(Some(request))))
    }

    fn take(&self) -> Option<Request> {
        self.0.lock().ok()?.take()
    }
}

/// Fallback installed on every table.
async fn hand_back(request: Request) -> Response {
    let mut response = http::StatusCode::NOT_FOUND.into_response();
    response.extensions_mut().insert(Unmatched::new(request));
    response
}

/// A named set of routes.
///
/// The router's fallback is replaced so that misses can fall through to the
/// next table of a composite; a fallback set on the router beforehand is
/// not kept.
///
/// ```rust
/// use axum::{Router, routing::get};
/// use axum_multidomain::RouteTable;
///
/// let table = RouteTable::new("blog", Router::new().route("/", get(|| async { "blog" })));
/// assert_eq!(table.name(), "blog");
/// ```
#[derive(Clone)]
pub struct RouteTable {
    name: Arc<str>,
    router: Router,
}

impl RouteTable {
    pub fn new(name: impl Into<String>, router: Router) -> Self {
        Self {
            name: Arc::from(name.into()),
            router: router.fallback(hand_back),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of route tables by name, filled once at startup.
#[derive(Clone, Debug, Default)]
pub struct RouteTables {
    tables: HashMap<String, RouteTable>,
}

impl RouteTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, returning the table previously registered under
    /// the same name.
    pub fn insert(&mut self, table: RouteTable) -> Option<RouteTable> {
        self.tables.insert(table.name().to_string(), table)
    }

    /// Registers a router under `name`.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, router: Router) -> Self {
        self.insert(RouteTable::new(name, router));
        self
    }

    pub fn get(&self, name: &str) -> Option<&RouteTable> {
        self.tables.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Builds a composite trying the named tables in the given order.
    pub fn compose<S: AsRef<str>>(&self, names: &[S]) -> Result<CompositeRouteTable> {
        let tables = names
            .iter()
            .map(|name| {
                self.get(name.as_ref()).cloned().ok_or_else(|| {
                    Error::config(format!("Unknown route table: '{}'", name.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if tables.is_empty() {
            return Err(Error::internal("Cannot compose an empty list of route tables"));
        }
        Ok(CompositeRouteTable { tables })
    }

    /// Ensures every table the configuration refers to is registered.
    pub fn check(&self, config: &MultiDomainConfig) -> Result<()> {
        for (domain, table) in &config.domains {
            if !self.contains(table) {
                return Err(Error::config(format!(
                    "Domain '{domain}' refers to unregistered route table '{table}'"
                )));
            }
        }

        if let Some(common) = &config.common_table
            && !self.contains(common)
        {
            return Err(Error::config(format!(
                "Common route table '{common}' is not registered"
            )));
        }
        Ok(())
    }
}

/// Ordered route tables consulted as one; the first match wins.
///
/// Implements `tower::Service`, so it can be called like any router. If no
/// member table matches, the composite answers `404 Not Found`.
#[derive(Clone)]
pub struct CompositeRouteTable {
    tables: Vec<RouteTable>,
}

impl CompositeRouteTable {
    /// Names of the member tables, in the order they are tried.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(RouteTable::name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Offers the request to each table in turn.
    pub async fn dispatch(&self, mut request: Request) -> Response {
        for table in &self.tables {
            let response = match table.router.clone().oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            };

            let unmatched = response.extensions().get::<Unmatched>().cloned();
            let Some(unmatched) = unmatched else {
                tracing::trace!(table = %table.name, "Route matched");
                return response;
            };

            request = match unmatched.take() {
                Some(request) => request,
                None => return Error::internal("Unmatched request was lost").into_response(),
            };
        }

        tracing::debug!(uri = %request.uri(), "No route matched in any table");
        http::StatusCode::NOT_FOUND.into_response()
    }
}

impl fmt::Debug for CompositeRouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.table_names()).finish()
    }
}

impl Service<Request> for CompositeRouteTable {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let composite = self.clone();
        Box::pin(async move { Ok(composite.dispatch(request).await) })
    }
}

/// Terminal service that dispatches a request to the composite route table
/// assigned to it by the multi-domain middleware.
///
/// Requests that reach it without an assigned table get `404 Not Found`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteDispatcher;

impl Service<Request> for RouteDispatcher {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let composite = request.extensions_mut().remove::<CompositeRouteTable>();
        Box::pin(async move {
            let Some(composite) = composite else {
                tracing::warn!(uri = %request.uri(), "No route table assigned to request");
                return Ok(
                    Error::new(crate::ErrorKind::NotFound, "No route table assigned").into_response(),
                );
            };
            Ok(composite.dispatch(request).await)
        })
    }
}
