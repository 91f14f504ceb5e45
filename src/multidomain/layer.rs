//! The multi-domain middleware.
//!
//! For every request [`MultiDomainService`] runs, in order:
//!
//! 1. **Redirect check** - a domain listed in `redirects` is answered with
//!    `301 Moved Permanently` to `https://{target}`. Nothing else runs.
//! 2. **Augment** - subdomain labels are attached as [`SubdomainParams`].
//! 3. **Resolve** - the domain's tables are looked up. Unknown domains get a
//!    `404 Not Found`; otherwise the [`CompositeRouteTable`] is inserted into
//!    the request extensions and the inner service is called.
//!
//! The inner service is normally [`RouteDispatcher`](super::RouteDispatcher),
//! possibly wrapped in further middleware.

use {
    super::{
        CompositeRouteTable, NormalizedHost, Resolution, RouteTables, augment::augment, policy,
    },
    crate::{Error, MultiDomainConfig, Result},
    axum::{
        extract::Request,
        response::{IntoResponse, Response},
    },
    http::{HeaderValue, StatusCode, Uri, header},
    std::{
        future::Future,
        pin::Pin,
        sync::Arc,
        task::{Context, Poll},
    },
    tower::{Layer, Service},
};

const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Configuration and tables shared by every request.
#[derive(Debug)]
struct Shared {
    config: MultiDomainConfig,
    tables: RouteTables,
}

/// Layer that applies the multi-domain middleware.
#[derive(Clone, Debug)]
pub struct MultiDomainLayer {
    shared: Arc<Shared>,
}

impl MultiDomainLayer {
    /// Creates the layer after validating the configuration against the
    /// registered tables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is invalid or
    /// refers to a table missing from `tables`.
    pub fn new(config: MultiDomainConfig, tables: RouteTables) -> Result<Self> {
        config.validate()?;
        tables.check(&config)?;

        tracing::debug!(
            domains = config.domains.len(),
            redirects = config.redirects.len(),
            tables = tables.len(),
            debug = config.debug,
            "Multi-domain routing configured"
        );

        Ok(Self {
            shared: Arc::new(Shared { config, tables }),
        })
    }

    pub fn config(&self) -> &MultiDomainConfig {
        &self.shared.config
    }
}

impl<S> Layer<S> for MultiDomainLayer {
    type Service = MultiDomainService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MultiDomainService {
            inner,
            shared: self.shared.clone(),
        }
    }
}

/// Service resolving each request's route tables from its host.
#[derive(Clone, Debug)]
pub struct MultiDomainService<S> {
    inner: S,
    shared: Arc<Shared>,
}

enum Outcome {
    Respond(Response),
    Dispatch(CompositeRouteTable),
}

impl<S> MultiDomainService<S> {
    fn decide(&self, request: &mut Request) -> Outcome {
        let config = &self.shared.config;
        let raw_host = request_host(request, config.trust_forwarded_host).unwrap_or_default();
        let host = NormalizedHost::parse(&raw_host);
        let domain = host.registrable_domain();

        if let Some(target) = policy::redirect_target(domain, config) {
            tracing::info!(domain = %domain, target = %target, "Redirecting domain");
            return Outcome::Respond(redirect_response(
                target,
                request.uri(),
                config.redirect_preserve_path,
            ));
        }

        augment(request, host.subdomains(), &config.subdomain_names);

        let resolution = policy::resolve_tables(domain, config);
        self.outcome(resolution, domain, &raw_host)
    }

    fn outcome(&self, resolution: Resolution, domain: &str, raw_host: &str) -> Outcome {
        match resolution {
            Resolution::Resolved(names) => match self.shared.tables.compose(names.as_slice()) {
                Ok(composite) => {
                    tracing::debug!(domain = %domain, tables = ?composite, "Resolved route tables");
                    Outcome::Dispatch(composite)
                }
                Err(err) => Outcome::Respond(err.into_response()),
            },
            Resolution::NotFound => {
                tracing::warn!(domain = %domain, host = %raw_host, "No route table for domain");
                Outcome::Respond(Error::domain_not_found(domain).into_response())
            }
            // Redirects are answered before augmentation.
            Resolution::Redirect(target) => {
                tracing::error!(domain = %domain, target = %target, "Redirect reached table resolution");
                Outcome::Respond(
                    Error::internal(format!("unexpected redirect for domain {domain}"))
                        .into_response(),
                )
            }
        }
    }
}

impl<S> Service<Request> for MultiDomainService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        match self.decide(&mut request) {
            Outcome::Respond(response) => Box::pin(async move { Ok(response) }),
            Outcome::Dispatch(composite) => {
                request.extensions_mut().insert(composite);

                // Keep the service that was polled ready for this call.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(request).await })
            }
        }
    }
}

/// Host the request was addressed to: `X-Forwarded-Host` when trusted, then
/// the `Host` header, then the URI authority (HTTP/2).
fn request_host<B>(request: &http::Request<B>, trust_forwarded: bool) -> Option<String> {
    let forwarded = trust_forwarded
        .then(|| header_str(request, X_FORWARDED_HOST))
        .flatten()
        .and_then(|v| v.split(',').next())
        .map(str::trim);

    forwarded
        .or_else(|| header_str(request, header::HOST.as_str()))
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .map(str::to_string)
}

fn header_str<'a, B>(request: &'a http::Request<B>, name: &str) -> Option<&'a str> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn redirect_response(target: &str, uri: &Uri, preserve_path: bool) -> Response {
    let mut location = format!("https://{target}");
    if preserve_path && let Some(path_and_query) = uri.path_and_query() {
        location.push_str(path_and_query.as_str());
    }

    match HeaderValue::from_str(&location) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response(),
        Err(err) => Error::from(err).into_response(),
    }
}
