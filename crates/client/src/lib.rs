//! Client-side state synchronization for the placemark catalog.
//!
//! Mirrors the place list from a running placemark server, caches it to a
//! local JSON file for offline use, queues mutations made while offline, and
//! follows live updates over the relay WebSocket.

pub mod cache;
pub mod error;
pub mod http;
pub mod model;
pub mod queue;
pub mod relay;
pub mod sync;

pub use error::ClientError;
pub use http::PlacesApi;
pub use sync::SyncStore;
