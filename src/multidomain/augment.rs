//! Subdomain parameters attached to requests.

use {
    axum::extract::FromRequestParts,
    http::{Request, request::Parts},
    std::{borrow::Cow, convert::Infallible},
};

/// Subdomain labels of the request's host, keyed by their configured names.
///
/// Inserted into the request extensions by the multi-domain middleware and
/// available to handlers as an extractor. Requests without subdomains yield
/// an empty set.
///
/// ```rust
/// use axum_multidomain::SubdomainParams;
///
/// async fn handler(params: SubdomainParams) -> String {
///     format!("tenant: {}", params.get("tenant").unwrap_or("none"))
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdomainParams(Vec<(String, String)>);

impl SubdomainParams {
    /// Names each label positionally: `names[i]` when configured, otherwise
    /// `subdomain{i + 1}`. Index 0 is the outermost label.
    pub fn from_labels(labels: &[String], names: &[String]) -> Self {
        Self(
            labels
                .iter()
                .enumerate()
                .map(|(index, label)| (label_name(index, names).into_owned(), label.clone()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Name given to the subdomain at `index`.
pub fn label_name(index: usize, names: &[String]) -> Cow<'_, str> {
    match names.get(index) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("subdomain{}", index + 1)),
    }
}

/// Attaches the subdomain labels to the request. No-op without labels.
pub fn augment<B>(request: &mut Request<B>, subdomains: &[String], names: &[String]) {
    if subdomains.is_empty() {
        return;
    }
    request
        .extensions_mut()
        .insert(SubdomainParams::from_labels(subdomains, names));
}

impl<S> FromRequestParts<S> for SubdomainParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SubdomainParams>()
            .cloned()
            .unwrap_or_default())
    }
}
