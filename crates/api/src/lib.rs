//! Placemark API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! relay) so integration tests and the binary entrypoint share the same
//! router and middleware stack.

pub mod config;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod router;
pub mod routes;
pub mod state;
