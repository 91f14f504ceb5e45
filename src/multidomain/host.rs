//! Host header normalization.
//!
//! Turns a raw `Host` value such as `shop.example.co.uk:8443` into its
//! registrable domain (`example.co.uk`) and the subdomain labels in front of
//! it (`["shop"]`). The registrable domain is found with the Public Suffix
//! List compiled into the `psl` crate, so multi-label suffixes like `co.uk`
//! are handled correctly.

use std::net::IpAddr;

/// A host name split into its registrable domain and subdomain labels.
///
/// `subdomains` keeps the left-to-right order of the original host, so the
/// label farthest from the registrable domain comes first:
///
/// ```rust
/// use axum_multidomain::NormalizedHost;
///
/// let host = NormalizedHost::parse("x.y.example.com:443");
/// assert_eq!(host.registrable_domain(), "example.com");
/// assert_eq!(host.subdomains(), ["x", "y"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHost {
    registrable_domain: String,
    subdomains: Vec<String>,
}

impl NormalizedHost {
    /// Normalizes a raw host value. Never fails.
    ///
    /// Hosts that cannot be classified against the Public Suffix List (IP
    /// addresses, single labels such as `localhost`, unknown TLDs) are kept
    /// whole as the registrable domain with no subdomains.
    pub fn parse(raw: &str) -> Self {
        let host = strip_port(raw.trim());
        let host = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();

        match registrable_suffix(&host) {
            Some(domain_len) if domain_len < host.len() => {
                // Everything before "<label>." is subdomain material.
                let prefix = &host[..host.len() - domain_len - 1];
                let subdomains = prefix
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .map(str::to_string)
                    .collect();

                Self {
                    registrable_domain: host[host.len() - domain_len..].to_string(),
                    subdomains,
                }
            }
            _ => Self::whole(host),
        }
    }

    fn whole(host: String) -> Self {
        Self {
            registrable_domain: host,
            subdomains: Vec::new(),
        }
    }

    /// The registrable domain, e.g. `example.co.uk`.
    pub fn registrable_domain(&self) -> &str {
        &self.registrable_domain
    }

    /// Subdomain labels, outermost first.
    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }

    /// Consumes the host and returns its parts.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.registrable_domain, self.subdomains)
    }
}

/// Returns the byte length of the registrable domain at the end of `host`,
/// or `None` when the host cannot be classified.
fn registrable_suffix(host: &str) -> Option<usize> {
    if host.is_empty() || host.parse::<IpAddr>().is_ok() {
        return None;
    }

    let domain = psl::domain(host.as_bytes())?;
    if !domain.suffix().is_known() {
        return None;
    }
    Some(domain.as_bytes().len())
}

/// Removes a trailing `:port`. Bracketed IPv6 literals lose their brackets,
/// bare IPv6 addresses are returned untouched.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(host, |(addr, _)| addr);
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}
