use serde::Deserialize;

/// Selects which optional middleware `setup_middleware()` installs.
///
/// ```toml
/// [http.middleware]
/// exclude = ["timeout", "logging"]
/// ```
///
/// The multi-domain layer itself is not optional and is always installed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMiddlewareConfig {
    Include(Vec<HttpMiddleware>),
    Exclude(Vec<HttpMiddleware>),
}

impl HttpMiddlewareConfig {
    pub fn is_enabled(&self, middleware: HttpMiddleware) -> bool {
        match self {
            HttpMiddlewareConfig::Include(list) => list.contains(&middleware),
            HttpMiddlewareConfig::Exclude(list) => !list.contains(&middleware),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum HttpMiddleware {
    MaxPayloadSize,
    RequestId,
    Logging,
    Liveness,
    Timeout,
    CatchPanic,
}
