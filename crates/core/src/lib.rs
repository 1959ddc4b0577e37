//! Shared domain types for the Placemark catalog.
//!
//! Holds the primitives every other crate depends on: id/timestamp aliases,
//! field validation, and the relay wire protocol.

pub mod relay;
pub mod types;
pub mod validation;
