use {
    crate::{Error, NormalizedHost, Result},
    serde::Deserialize,
    std::collections::{HashMap, HashSet},
};

///
/// Configuration for multi-domain routing.
///
/// ```toml
/// [multi_domain]
/// common_table = "common"
/// default_domain = "example.com"
/// subdomain_names = ["tenant", "region"]
/// debug = false
///
/// [multi_domain.domains]
/// "example.com" = "main"
/// "example.co.uk" = "uk"
///
/// [multi_domain.redirects]
/// "old-example.com" = "example.com"
/// ```
///
/// Domain keys are registrable domains: lowercase, without port and without
/// subdomains. Table names refer to route tables registered on the router.
///
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MultiDomainConfig {
    /// Registrable domain to route table name.
    #[serde(default)]
    pub domains: HashMap<String, String>,

    /// Table consulted after the domain-specific one for every resolved domain.
    #[serde(default)]
    pub common_table: Option<String>,

    /// Domain whose table is used for unknown domains when `debug` is set.
    #[serde(default)]
    pub default_domain: Option<String>,

    /// Registrable domain to target host. Redirects take precedence over
    /// `domains`.
    #[serde(default)]
    pub redirects: HashMap<String, String>,

    /// Names for subdomain labels, outermost first. Labels beyond the list
    /// are named `subdomain{n}`.
    #[serde(default)]
    pub subdomain_names: Vec<String>,

    /// Enables the `default_domain` fallback for unknown domains.
    #[serde(default)]
    pub debug: bool,

    /// Take the host from `X-Forwarded-Host` when present. Only enable behind
    /// a proxy that sets it.
    #[serde(default)]
    pub trust_forwarded_host: bool,

    /// Keep the request path and query on redirects instead of sending the
    /// client to the target's root.
    #[serde(default)]
    pub redirect_preserve_path: bool,
}

impl MultiDomainConfig {
    /// Maps a registrable domain to a route table.
    pub fn with_domain(mut self, domain: impl Into<String>, table: impl Into<String>) -> Self {
        self.domains.insert(domain.into(), table.into());
        self
    }

    pub fn with_common_table(mut self, table: impl Into<String>) -> Self {
        self.common_table = Some(table.into());
        self
    }

    pub fn with_default_domain(mut self, domain: impl Into<String>) -> Self {
        self.default_domain = Some(domain.into());
        self
    }

    /// Redirects a registrable domain permanently to `target`.
    pub fn with_redirect(mut self, domain: impl Into<String>, target: impl Into<String>) -> Self {
        self.redirects.insert(domain.into(), target.into());
        self
    }

    pub fn with_subdomain_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomain_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_trust_forwarded_host(mut self, trust: bool) -> Self {
        self.trust_forwarded_host = trust;
        self
    }

    pub fn with_redirect_preserve_path(mut self, preserve: bool) -> Self {
        self.redirect_preserve_path = preserve;
        self
    }

    ///
    /// Validates domain keys, redirect targets and subdomain names.
    ///
    /// A `default_domain` that is missing from `domains` is not an error:
    /// the debug fallback then resolves nothing, which is logged here.
    ///
    pub fn validate(&self) -> Result<()> {
        for (domain, table) in &self.domains {
            validate_domain_key("domains", domain)?;
            if table.trim().is_empty() {
                return Err(Error::config(format!(
                    "multi_domain.domains: domain '{domain}' has an empty table name"
                )));
            }
        }

        for (domain, target) in &self.redirects {
            validate_domain_key("redirects", domain)?;
            validate_redirect_target(domain, target)?;
        }

        if let Some(common) = &self.common_table
            && common.trim().is_empty()
        {
            return Err(Error::config("multi_domain.common_table must not be empty"));
        }

        let mut seen = HashSet::with_capacity(self.subdomain_names.len());
        for name in &self.subdomain_names {
            if name.trim().is_empty() {
                return Err(Error::config(
                    "multi_domain.subdomain_names must not contain empty names",
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::config(format!(
                    "multi_domain.subdomain_names contains '{name}' more than once"
                )));
            }
        }

        if let Some(default) = &self.default_domain
            && !self.domains.contains_key(default)
        {
            tracing::warn!(
                default_domain = %default,
                "default_domain is not listed in multi_domain.domains; debug fallback will not resolve"
            );
        }

        Ok(())
    }
}

fn validate_domain_key(section: &str, domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::config(format!(
            "multi_domain.{section}: domain keys must not be empty"
        )));
    }
    if domain.contains(':') {
        return Err(Error::config(format!(
            "multi_domain.{section}: domain '{domain}' must not include a port"
        )));
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(Error::config(format!(
            "multi_domain.{section}: domain '{domain}' must not start or end with '.'"
        )));
    }
    if domain.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::config(format!(
            "multi_domain.{section}: domain '{domain}' must be lowercase"
        )));
    }
    if !domain.is_ascii() {
        return Err(Error::config(format!(
            "multi_domain.{section}: domain '{domain}' must be ASCII; use its punycode form"
        )));
    }
    let host = NormalizedHost::parse(domain);
    if host.registrable_domain() != domain {
        return Err(Error::config(format!(
            "multi_domain.{section}: domain '{domain}' is not a registrable domain; \
             requests for it resolve as '{}'",
            host.registrable_domain()
        )));
    }
    Ok(())
}

fn validate_redirect_target(domain: &str, target: &str) -> Result<()> {
    if target.trim().is_empty() {
        return Err(Error::config(format!(
            "multi_domain.redirects: '{domain}' has an empty redirect target"
        )));
    }
    let url = url::Url::parse(&format!("https://{target}")).map_err(|e| {
        Error::config(format!(
            "multi_domain.redirects: '{domain}' has an invalid target '{target}': {e}"
        ))
    })?;
    // The target is a bare host; the request path may be appended to it.
    if url.path() != "/"
        || target.ends_with('/')
        || url.query().is_some()
        || url.fragment().is_some()
        || !url.username().is_empty()
        || url.password().is_some()
    {
        return Err(Error::config(format!(
            "multi_domain.redirects: '{domain}' target '{target}' must be a host with an \
             optional port, without path, query, fragment or credentials"
        )));
    }
    Ok(())
}
