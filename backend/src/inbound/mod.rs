//! Inbound adapters that translate external requests into domain calls while
//! keeping framework details at the edge.
//!
//! REST and documentation handlers live under [`http`]; the GraphQL
//! sub-application (HTTP execution plus the WebSocket subscription
//! transport) lives under [`graphql`].

pub mod graphql;
pub mod http;
mod templates;
