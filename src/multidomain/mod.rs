//! Host-based route table selection.
//!
//! The pieces, from the leaves up:
//!
//! - [`host`] - splits a host into registrable domain and subdomain labels
//! - [`policy`] - decides between redirect, a list of route tables, or not found
//! - [`table`] - named route tables and their first-match-wins composition
//! - [`augment`] - subdomain labels exposed to handlers as [`SubdomainParams`]
//! - [`layer`] - the tower middleware wiring everything together

pub mod augment;
pub mod host;
pub mod layer;
pub mod policy;
pub mod table;

pub use augment::{SubdomainParams, label_name};
pub use host::NormalizedHost;
pub use layer::{MultiDomainLayer, MultiDomainService};
pub use policy::{Resolution, redirect_target, resolve, resolve_tables};
pub use table::{CompositeRouteTable, RouteDispatcher, RouteTable, RouteTables};
