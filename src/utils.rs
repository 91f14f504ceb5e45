//!
//! Small helpers shared by the configuration and router modules.
//!
//! - [`RequestIdGenerator`] keeps an incoming `x-request-id` or mints a UUIDv7
//! - [`replace_handlebars_with_env`] substitutes `{{ VAR }}` placeholders in config text
//!

use {
    http::{HeaderValue, Request},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
    tower_http::request_id::{MakeRequestId, RequestId},
    uuid::{ContextV7, Timestamp, Uuid},
};

pub(crate) const X_REQUEST_ID: &str = "x-request-id";

/// Matches `{{ VAR_NAME }}` with optional whitespace; names are uppercase
/// letters, digits and underscores.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Request ID source for `SetRequestIdLayer`.
///
/// An `x-request-id` sent by the client (or an upstream proxy) is preserved so
/// the same ID follows the request across hosts; otherwise a time-ordered
/// UUIDv7 is generated.
///
/// ```
/// use axum_multidomain::RequestIdGenerator;
/// use tower_http::request_id::SetRequestIdLayer;
///
/// let layer = SetRequestIdLayer::x_request_id(RequestIdGenerator);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, req: &Request<B>) -> Option<RequestId> {
        match req.headers().get(X_REQUEST_ID) {
            Some(value) => Some(RequestId::new(value.clone())),
            None => {
                let cx = ContextV7::new().with_additional_precision();
                let uuid = Uuid::new_v7(Timestamp::now(cx));
                let value = HeaderValue::from_str(&uuid.to_string()).ok()?;
                Some(RequestId::new(value))
            }
        }
    }
}

/// Replaces handlebars-style placeholders with environment variable values.
///
/// `{{VAR}}`, `{{ VAR }}` and `{{  VAR  }}` are equivalent. Unset variables
/// are replaced with an empty string and logged at warn level.
///
/// ```
/// use axum_multidomain::replace_handlebars_with_env;
///
/// let text = "Value: {{ SURELY_NOT_SET_ANYWHERE }}";
/// assert_eq!(replace_handlebars_with_env(text), "Value: ");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}
