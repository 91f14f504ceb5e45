//! Middleware-specific tests for FluentRouter
//!
//! Tests are organized by middleware type in separate modules.

mod catch_panic;
mod config;
mod liveness;
mod max_payload_size;
mod request_id;
mod timeout;
