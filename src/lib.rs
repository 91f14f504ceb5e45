//! # axum-multidomain
//!
//! Host-based route table selection for Axum services that answer for many
//! domains from one process.
//!
//! Each request's host is normalized to its registrable domain (using the
//! Public Suffix List, so `shop.example.co.uk` belongs to `example.co.uk`),
//! then:
//!
//! - domains listed under `redirects` get a `301` to their target host;
//! - the domain's route table, followed by an optional common table, answers
//!   the request, the first matching route winning;
//! - unknown domains get a `404` (or, in debug mode, the default domain's table);
//! - subdomain labels are available to handlers as [`SubdomainParams`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use axum_multidomain::{Config, FluentRouter, Result, SubdomainParams};
//!
//! async fn home(params: SubdomainParams) -> String {
//!     format!("tenant: {}", params.get("tenant").unwrap_or("-"))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();  // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     FluentRouter::without_state(config)?
//!         .table("main", Router::new().route("/", get(home)))
//!         .table("common", Router::new().route("/about", get(|| async { "about" })))
//!         .setup_middleware()?
//!         .start()
//!         .await
//! }
//! ```
//!
//! With `config/dev.toml`:
//! ```toml
//! [http]
//! bind_port = 3000
//!
//! [multi_domain]
//! common_table = "common"
//! subdomain_names = ["tenant"]
//!
//! [multi_domain.domains]
//! "example.com" = "main"
//!
//! [multi_domain.redirects]
//! "example.net" = "example.com"
//! ```
//!
//! Run with `RUST_ENV=dev cargo run`.
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and validation ([`Config`], [`MultiDomainConfig`]) |
//! | [`multidomain`] | Host normalization, resolution policy, route tables, the middleware |
//! | [`fluent`] | Router builder and middleware setup ([`FluentRouter`]) |
//! | [`error`] | Error types and handling ([`Error`]) |
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type. Errors convert to structured JSON responses:
//!
//! ```json
//! {
//!   "error_code": "DOMAIN_NOT_FOUND",
//!   "message": "No route table configured for domain: unknown.org"
//! }
//! ```
//!
//! # Middleware Control
//!
//! ```toml
//! [http.middleware]
//! exclude = ["timeout", "max-payload-size"]
//! ```
pub mod config;
pub mod error;
pub mod fluent;
pub mod multidomain;
mod utils;

pub use config::*;
pub use error::*;
pub use fluent::*;
pub use multidomain::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
