//! `placemark-client` -- terminal watcher for a placemark server.
//!
//! Fetches the place list (falling back to the offline cache), follows live
//! relay events, and keeps the local mirror in sync until interrupted.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default                      | Description                         |
//! |---------------------------|----------|------------------------------|-------------------------------------|
//! | `PLACEMARK_SERVER_URL`    | no       | `http://127.0.0.1:3000`      | Base URL of the placemark server    |
//! | `PLACEMARK_WS_URL`        | no       | derived from the server URL  | Relay endpoint, e.g. `ws://host:3000/ws` |
//! | `PLACEMARK_CACHE_FILE`    | no       | `placemark-cache.json`       | Offline cache path                  |
//! | `PLACEMARK_AUTO_REFRESH`  | no       | unset                        | `true`/`false` toggles the server's auto-refresh generator |

use placemark_core::relay::RelayMessage;

use placemark_client::cache::CacheFile;
use placemark_client::http::PlacesApi;
use placemark_client::relay::RelayClient;
use placemark_client::sync::SyncStore;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_CACHE_FILE: &str = "placemark-cache.json";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placemark_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_url =
        std::env::var("PLACEMARK_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let ws_url = std::env::var("PLACEMARK_WS_URL").unwrap_or_else(|_| derive_ws_url(&server_url));
    let cache_file =
        std::env::var("PLACEMARK_CACHE_FILE").unwrap_or_else(|_| DEFAULT_CACHE_FILE.to_string());

    tracing::info!(server_url = %server_url, ws_url = %ws_url, cache_file = %cache_file, "Starting placemark-client");

    let mut store = SyncStore::new(PlacesApi::new(&server_url), CacheFile::new(&cache_file));
    store.start().await;

    if let Some(error) = store.last_error() {
        tracing::warn!(%error, "Running from cached data");
    }
    println!("{} places known:", store.places().len());
    for place in store.places() {
        println!("  [{}] {} ({}) - rating {}", place.id, place.name, place.location, place.rating);
    }

    let (relay, mut events) = RelayClient::connect(ws_url);

    if let Ok(flag) = std::env::var("PLACEMARK_AUTO_REFRESH") {
        let enabled = flag.eq_ignore_ascii_case("true") || flag == "1";
        relay.toggle_auto_refresh(enabled);
        tracing::info!(enabled, "Requested auto-refresh toggle");
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(message) = event else {
                    tracing::info!("Relay channel closed, exiting");
                    break;
                };
                match message {
                    RelayMessage::Connected => {
                        println!("relay: connected");
                    }
                    RelayMessage::AutoRefreshStatus { enabled } => {
                        println!("relay: auto-refresh {}", if enabled { "on" } else { "off" });
                    }
                    RelayMessage::Update(event) => {
                        store.apply_update(&event);
                        println!("relay: {event:?} - {} places", store.places().len());
                    }
                    RelayMessage::ToggleAutoRefresh { .. } => {
                        // Client-originated; not expected from the server.
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
        }
    }

    relay.shutdown();
}

/// Turn an HTTP base URL into the matching relay endpoint.
fn derive_ws_url(server_url: &str) -> String {
    let ws_base = if let Some(rest) = server_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = server_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        format!("ws://{server_url}")
    };
    format!("{}/ws", ws_base.trim_end_matches('/'))
}
