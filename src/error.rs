//! Error types and handling for the multi-domain routing library.
//!
//! Errors come in two flavours. Startup errors (invalid TOML, a domain that
//! points at a route table that was never registered, a malformed redirect
//! target) are returned as [`Error`] values from configuration and router
//! building. Request-time outcomes never fail: the resolution policy is
//! total, and the only terminal outcomes are a redirect or a not-found
//! response, the latter rendered through [`Error::domain_not_found`].
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern.
//!
//! # Example
//!
//! ```rust
//! use axum_multidomain::{Error, ErrorKind};
//! use axum::http::StatusCode;
//!
//! let error = Error::config("domain 'example.com' refers to unknown table 'main'");
//!
//! match error.kind() {
//!     ErrorKind::Configuration => println!("Fix your config: {}", error),
//!     _ => println!("Other error: {}", error),
//! }
//!
//! assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so always include a wildcard arm
/// when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Configuration error (invalid TOML, unknown table references, bad domain keys).
    #[error("configuration error")]
    Configuration,

    /// I/O error (config file access, listener binding).
    #[error("I/O error")]
    Io,

    /// Invalid input (bad URL, header, request data).
    #[error("invalid input")]
    InvalidInput,

    /// No route table could be resolved for the request's host.
    #[error("domain not found")]
    NotFound,

    /// Internal/unexpected error.
    #[error("internal error")]
    Internal,
}

/// An error that can occur in the axum-multidomain library.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use axum_multidomain::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::Internal, "something went wrong");
/// assert_eq!(err.kind(), ErrorKind::Internal);
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error code string for this error.
    ///
    /// This is a stable identifier suitable for client-side error handling.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NotFound => "DOMAIN_NOT_FOUND",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into a structured error response.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an I/O error from a message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg.into())
    }

    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }

    /// Creates the error rendered when no route table serves a host.
    pub fn domain_not_found(domain: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("No route table configured for domain: {}", domain.as_ref()),
        )
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        if status.is_server_error() {
            tracing::error!(
                error_code = %error_response.error_code,
                message = %error_response.message,
                status = %status.as_u16(),
                "Error occurred"
            );
        } else {
            tracing::debug!(
                error_code = %error_response.error_code,
                message = %error_response.message,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

// ============================================================================
// ErrorResponse
// ============================================================================

/// Structured error response with error code and details.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Unique error code for client-side error handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Adds details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
