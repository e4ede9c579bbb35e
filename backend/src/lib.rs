//! Hello-timer service library: a small REST facade with generated
//! documentation plus a GraphQL sub-application exposing a `hello` query and
//! a `timer` countdown subscription.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod server;

/// Public OpenAPI surface used by the documentation pages and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
