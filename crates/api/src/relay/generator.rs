use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use placemark_core::relay::{RelayMessage, UpdateEvent};
use placemark_core::validation::NewPlace;
use placemark_db::models::PlaceListParams;
use placemark_db::store::CatalogStore;
use rand::Rng;

use crate::relay::RelayHub;

/// Interval between generator ticks.
const TICK_INTERVAL: Duration = Duration::from_secs(3);

/// Probability of synthesizing a brand-new place on a tick; otherwise an
/// existing place is mutated.
const ADD_PROBABILITY: f64 = 0.3;

/// Spawn the auto-refresh generator task.
///
/// Every 3 seconds, while the hub's auto-refresh flag is enabled and at
/// least one client is connected, it randomly either creates a new place or
/// mutates a randomly chosen existing place's rating and location, persists
/// the change through the store, and broadcasts the corresponding update
/// event to all clients. A persistence failure is logged and that tick is
/// skipped. Runs until aborted at shutdown.
pub fn start_generator(
    store: Arc<dyn CatalogStore>,
    hub: Arc<RelayHub>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        let mut counter: u64 = 1;

        loop {
            interval.tick().await;

            if !hub.auto_refresh_enabled() || hub.connection_count().await == 0 {
                continue;
            }

            if let Err(e) = tick(store.as_ref(), &hub, &mut counter).await {
                tracing::error!(error = %e, "Auto-refresh tick failed, skipping");
            }
        }
    })
}

async fn tick(
    store: &dyn CatalogStore,
    hub: &RelayHub,
    counter: &mut u64,
) -> Result<(), placemark_db::store::StoreError> {
    // Draw all randomness up front; the rng must not be held across awaits.
    let (add_new, location_n, rating) = {
        let mut rng = rand::rng();
        (
            rng.random_bool(ADD_PROBABILITY),
            rng.random_range(0..100),
            rng.random_range(1..=5),
        )
    };

    if add_new {
        let data = NewPlace {
            name: format!("Auto Generated Place {counter}"),
            location: format!("Location {location_n}"),
            rating,
            description: format!("This is an automatically generated place {counter}"),
            video_url: None,
            category_id: None,
        };
        *counter += 1;

        let place = store.create_place(data).await?;
        tracing::debug!(place_id = place.id, "Auto-generated place");

        broadcast_event(hub, UpdateEvent::Add {
            data: serde_json::to_value(&place).unwrap_or_default(),
        })
        .await;
    } else {
        let places = store.list_places(&PlaceListParams::default()).await?;
        if places.is_empty() {
            return Ok(());
        }

        let index = {
            let mut rng = rand::rng();
            rng.random_range(0..places.len())
        };
        let target = &places[index];

        let data = NewPlace {
            name: target.name.clone(),
            location: format!("Updated Location {location_n}"),
            rating,
            description: target.description.clone(),
            video_url: target.video_url.clone(),
            category_id: target.category_id,
        };

        // The target may vanish between the list and the write; skip quietly.
        let Some(updated) = store.update_place(target.id, data).await? else {
            return Ok(());
        };
        tracing::debug!(place_id = updated.id, "Auto-mutated place");

        broadcast_event(hub, UpdateEvent::Refresh {
            data: serde_json::to_value(&updated).unwrap_or_default(),
        })
        .await;
    }

    Ok(())
}

async fn broadcast_event(hub: &RelayHub, event: UpdateEvent) {
    if let Ok(text) = serde_json::to_string(&RelayMessage::Update(event)) {
        hub.broadcast(Message::Text(text.into())).await;
    }
}
