//! The WebSocket broadcast relay.
//!
//! A single `/ws` endpoint through which connected clients exchange catalog
//! mutation events. The hub tracks connections and fans events out through
//! bounded per-connection queues; the generator synthesizes demo mutations
//! while auto-refresh is enabled.

mod generator;
pub mod hub;
mod socket;

pub use generator::start_generator;
pub use hub::RelayHub;
pub use socket::ws_handler;
