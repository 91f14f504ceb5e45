mod middleware;

pub use middleware::*;

use {crate::Result, serde::Deserialize, std::time::Duration};

///
/// Configuration for the HTTP server
///
/// Controls where the server binds, request limits and timeouts, and which
/// of the optional middleware layers are installed around the multi-domain
/// router.
///
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// IP address to bind the HTTP server to
    /// The default `bind_addr` is "127.0.0.1".
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,

    /// Port to bind the HTTP server to
    /// The default `bind_port` is 3000.
    #[serde(default = "HttpConfig::default_bind_port")]
    pub bind_port: u16,

    /// Maximum allowed time for a request to complete before timing out
    /// with a 408 Request Timeout response. By default `request_timeout` is None.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,

    /// Maximum payload size in bytes for incoming HTTP requests.
    /// Larger requests are rejected with 413 Payload Too Large.
    /// By default `max_payload_size_bytes` is set to 32KiB.
    #[serde(default = "HttpConfig::default_max_payload_size_bytes")]
    pub max_payload_size_bytes: byte_unit::Byte,

    /// Route for liveness checks. It is answered before host resolution,
    /// so probes work whatever host they use.
    /// By default `liveness_route` is "/live".
    #[serde(default = "HttpConfig::default_liveness_route")]
    pub liveness_route: String,

    /// Maximum time to wait for graceful shutdown to complete.
    /// By default `shutdown_timeout` is set to 30 seconds.
    #[serde(
        default = "HttpConfig::default_shutdown_timeout",
        with = "humantime_serde"
    )]
    pub shutdown_timeout: Duration,

    /// Optional middleware selection. When absent, all middleware is enabled.
    #[serde(default)]
    pub middleware: Option<HttpMiddlewareConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::default_bind_addr(),
            bind_port: Self::default_bind_port(),
            request_timeout: None,
            max_payload_size_bytes: Self::default_max_payload_size_bytes(),
            liveness_route: Self::default_liveness_route(),
            shutdown_timeout: Self::default_shutdown_timeout(),
            middleware: None,
        }
    }
}

impl HttpConfig {
    ///
    /// Returns the full bind address as a string in the format "IP:PORT".
    ///
    pub fn full_bind_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }

    fn default_bind_addr() -> String {
        "127.0.0.1".into()
    }

    fn default_bind_port() -> u16 {
        3000
    }

    fn default_max_payload_size_bytes() -> byte_unit::Byte {
        byte_unit::Byte::from_u64(32 * 1024)
    }

    fn default_liveness_route() -> String {
        "/live".into()
    }

    fn default_shutdown_timeout() -> Duration {
        Duration::from_secs(30)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(crate::Error::invalid_input(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }

        if self.bind_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(crate::Error::invalid_input(
                "HTTP bind_addr must be a valid IP address. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
            ));
        }

        if !self.liveness_route.starts_with('/') {
            return Err(crate::Error::invalid_input(format!(
                "HTTP liveness_route must start with '/', got \"{}\"",
                self.liveness_route
            )));
        }

        if self.max_payload_size_bytes.as_u64() == 0 {
            return Err(crate::Error::invalid_input(
                "HTTP max_payload_size_bytes must be greater than zero",
            ));
        }

        Ok(())
    }
}
