//! Multi-domain routing: installs the route tables behind the host resolver.

use super::router::FluentRouter;
use crate::{Error, MultiDomainLayer, Result, RouteDispatcher};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Installs the multi-domain layer and the dispatcher for the registered
    /// route tables.
    ///
    /// Every request that reaches the router's fallback is resolved by host:
    /// redirected domains get a `301`, unknown domains a `404` with error code
    /// `DOMAIN_NOT_FOUND`, and resolved domains are dispatched to their
    /// domain table followed by the common table.
    ///
    /// This must be the first `setup_*` call. Routes added to the router
    /// afterwards (the liveness probe for instance) are answered without
    /// looking at the host.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `[multi_domain]` is invalid or names a
    /// table that was never registered, and an internal error if called twice.
    pub fn setup_multi_domain(mut self) -> Result<Self> {
        if self.multi_domain_installed {
            return Err(Error::internal("Multi-domain routing is already installed"));
        }

        let tables = std::mem::take(&mut self.tables);
        let layer = MultiDomainLayer::new(self.config.multi_domain.clone(), tables)?;

        self.inner = self.inner.fallback_service(RouteDispatcher).layer(layer);
        self.multi_domain_installed = true;
        Ok(self)
    }
}
