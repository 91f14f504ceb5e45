//! FluentRouter and middleware configuration.
//!
//! The functionality is split across submodules:
//!
//! - [`router`] - Core `FluentRouter` struct, initialization and table registration
//! - [`routing`] - Multi-domain layer and route dispatcher installation
//! - [`observability`] - Request logging
//! - [`request`] - Payload limits and request IDs
//! - [`features`] - Timeout and liveness probe
//! - [`control`] - Panic catching
//! - [`builder`] - Orchestration (setup_middleware, start, layer)

mod router;
mod routing;
mod observability;
mod request;
mod features;
mod control;
mod builder;

pub use router::FluentRouter;

#[cfg(test)]
mod tests;
