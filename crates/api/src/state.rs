use std::sync::Arc;

use placemark_db::store::CatalogStore;

use crate::relay::RelayHub;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`. The store is injected as a
/// trait object so the same handlers run against either backend (and tests
/// construct a fresh in-memory instance per test).
#[derive(Clone)]
pub struct AppState {
    /// Catalog storage, memory- or Postgres-backed.
    pub store: Arc<dyn CatalogStore>,
    /// WebSocket relay hub.
    pub relay: Arc<RelayHub>,
}
