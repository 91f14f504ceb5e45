//! Domain resolution policy.
//!
//! Pure functions deciding what happens to a request given its registrable
//! domain and the [`MultiDomainConfig`]: redirect it, route it through an
//! ordered list of route tables, or reject it as not found.

use crate::MultiDomainConfig;

/// Outcome of resolving a registrable domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Permanently redirect to the given domain.
    Redirect(String),
    /// Route through these tables, in order. Never empty.
    Resolved(Vec<String>),
    /// No table serves this domain.
    NotFound,
}

/// Resolves a registrable domain against the configuration.
///
/// Redirects always win over table lookup, even when the domain also has a
/// route table of its own.
///
/// ```rust
/// use axum_multidomain::{MultiDomainConfig, Resolution, resolve};
///
/// let config = MultiDomainConfig::default()
///     .with_domain("a.com", "t1")
///     .with_common_table("common");
///
/// assert_eq!(
///     resolve("a.com", &config),
///     Resolution::Resolved(vec!["t1".into(), "common".into()])
/// );
/// assert_eq!(resolve("b.com", &config), Resolution::NotFound);
/// ```
pub fn resolve(domain: &str, config: &MultiDomainConfig) -> Resolution {
    match redirect_target(domain, config) {
        Some(target) => Resolution::Redirect(target.to_string()),
        None => resolve_tables(domain, config),
    }
}

/// Returns the redirect target for `domain`, if one is configured.
pub fn redirect_target<'a>(domain: &str, config: &'a MultiDomainConfig) -> Option<&'a str> {
    config.redirects.get(domain).map(String::as_str)
}

/// Table selection without the redirect check.
///
/// The domain's own table comes first and the common table second, so
/// common routes never shadow domain routes. In debug mode an unknown domain
/// borrows the default domain's table. Returns [`Resolution::NotFound`]
/// rather than an empty table list when nothing applies, and never returns
/// [`Resolution::Redirect`].
pub fn resolve_tables(domain: &str, config: &MultiDomainConfig) -> Resolution {
    let Some(specific) = config
        .domains
        .get(domain)
        .or_else(|| debug_fallback(config))
    else {
        return Resolution::NotFound;
    };

    let mut tables = Vec::with_capacity(2);
    tables.push(specific.clone());
    if let Some(common) = &config.common_table {
        tables.push(common.clone());
    }
    Resolution::Resolved(tables)
}

fn debug_fallback(config: &MultiDomainConfig) -> Option<&String> {
    if !config.debug {
        return None;
    }
    config
        .default_domain
        .as_ref()
        .and_then(|default| config.domains.get(default))
}
