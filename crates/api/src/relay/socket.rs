use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use placemark_core::relay::{RelayMessage, UpdateEvent};
use placemark_core::validation::validate_place;
use placemark_db::store::{CatalogStore, StoreError};

use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single relay connection after upgrade.
///
/// Registers with the hub, sends the `connected` handshake, spawns a sender
/// task that drains the hub queue into the socket sink, then processes
/// inbound messages on the current task until the peer disconnects.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Relay client connected");

    let mut rx = state.relay.add(conn_id.clone()).await;

    let handshake = serde_json::to_string(&RelayMessage::Connected)
        .unwrap_or_else(|_| r#"{"type":"connected"}"#.to_string());
    state
        .relay
        .send_to(&conn_id, Message::Text(handshake.into()))
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward queued messages to the WebSocket sink. A failed
    // send ends the task; the event is not retried.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "Relay sink closed");
                break;
            }
        }
    });

    // Receiver loop: dispatch inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_message(&state, &conn_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {
                // Binary / Ping frames carry no relay traffic.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Relay receive error");
                break;
            }
        }
    }

    state.relay.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Relay client disconnected");
}

/// Dispatch one inbound text frame.
///
/// Malformed JSON is logged and ignored; the connection stays open. Update
/// events are persisted best-effort and then rebroadcast *verbatim* to every
/// other connection, so receivers see the byte-identical frame. Only a
/// storage failure suppresses the rebroadcast.
async fn handle_message(state: &AppState, conn_id: &str, text: &str) {
    let message: RelayMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Ignoring malformed relay message");
            return;
        }
    };

    match message {
        RelayMessage::ToggleAutoRefresh { enabled } => {
            state.relay.set_auto_refresh(enabled);
            tracing::info!(enabled, "Auto-refresh toggled");

            let status = RelayMessage::AutoRefreshStatus { enabled };
            if let Ok(status_text) = serde_json::to_string(&status) {
                state.relay.broadcast(Message::Text(status_text.into())).await;
            }
        }
        RelayMessage::Update(event) => {
            match persist_update(state.store.as_ref(), &event).await {
                Ok(()) => {
                    state
                        .relay
                        .broadcast_except(conn_id, Message::Text(text.to_string().into()))
                        .await;
                }
                Err(e) => {
                    tracing::error!(conn_id = %conn_id, error = %e, "Relay persistence failed, skipping broadcast");
                }
            }
        }
        // Server-originated message types arriving from a client.
        RelayMessage::Connected | RelayMessage::AutoRefreshStatus { .. } => {
            tracing::debug!(conn_id = %conn_id, "Ignoring server-only relay message from client");
        }
    }
}

/// Write a relayed mutation through the store, best-effort.
///
/// Deleting an already-absent place and add/refresh payloads that fail to
/// parse as a place are logged and tolerated; the event still relays.
async fn persist_update(store: &dyn CatalogStore, event: &UpdateEvent) -> Result<(), StoreError> {
    match event {
        UpdateEvent::Add { data } => match parse_place_payload(data) {
            Some(new_place) => {
                let place = store.create_place(new_place).await?;
                tracing::info!(place_id = place.id, "Relayed place persisted");
            }
            None => {
                tracing::warn!("Relayed add event carried an invalid place, not persisting");
            }
        },
        UpdateEvent::Refresh { data } => {
            let id = data.get("id").and_then(serde_json::Value::as_i64);
            match (id, parse_place_payload(data)) {
                (Some(id), Some(update)) => {
                    if store.update_place(id, update).await?.is_none() {
                        tracing::debug!(place_id = id, "Relayed refresh targeted a missing place");
                    }
                }
                _ => {
                    tracing::warn!("Relayed refresh event carried an invalid place, not persisting");
                }
            }
        }
        UpdateEvent::Delete { id } => {
            if store.delete_place(*id).await?.is_none() {
                tracing::debug!(place_id = id, "Relayed delete targeted a missing place");
            }
        }
    }
    Ok(())
}

/// Validate the `data` payload of an add/refresh event.
fn parse_place_payload(data: &serde_json::Value) -> Option<placemark_core::validation::NewPlace> {
    validate_place(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayHub;
    use placemark_db::models::PlaceListParams;
    use placemark_db::store::MemoryStore;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            relay: Arc::new(RelayHub::new()),
        }
    }

    fn as_text(msg: Message) -> String {
        match msg {
            Message::Text(text) => text.to_string(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_event_relays_verbatim_to_other_connections() {
        let state = test_state();
        let mut rx_sender = state.relay.add("sender".to_string()).await;
        let mut rx_other = state.relay.add("other".to_string()).await;

        // Key order and whitespace must survive unchanged.
        let frame = r#"{"type":"update",  "action":"add","data":{"rating":5,"name":"Relayed Cove","location":"Shoreline","description":"From another tab"}}"#;
        handle_message(&state, "sender", frame).await;

        assert_eq!(as_text(rx_other.recv().await.unwrap()), frame);
        assert!(rx_sender.try_recv().is_err());

        // The mutation was written through the store.
        let places = state
            .store
            .list_places(&PlaceListParams::default())
            .await
            .unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Relayed Cove");
    }

    #[tokio::test]
    async fn toggle_broadcasts_status_to_everyone_including_sender() {
        let state = test_state();
        let mut rx_sender = state.relay.add("sender".to_string()).await;
        let mut rx_other = state.relay.add("other".to_string()).await;

        handle_message(
            &state,
            "sender",
            r#"{"type":"toggle-auto-refresh","enabled":true}"#,
        )
        .await;

        assert!(state.relay.auto_refresh_enabled());
        let expected = r#"{"type":"auto-refresh-status","enabled":true}"#;
        assert_eq!(as_text(rx_sender.recv().await.unwrap()), expected);
        assert_eq!(as_text(rx_other.recv().await.unwrap()), expected);
    }

    #[tokio::test]
    async fn malformed_frames_are_ignored() {
        let state = test_state();
        let mut rx_other = state.relay.add("other".to_string()).await;

        handle_message(&state, "sender", "not json at all").await;
        handle_message(&state, "sender", r#"{"type":"unknown-kind"}"#).await;

        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn delete_of_missing_place_still_relays() {
        let state = test_state();
        let mut rx_other = state.relay.add("other".to_string()).await;

        let frame = r#"{"type":"update","action":"delete","id":9999}"#;
        handle_message(&state, "sender", frame).await;

        assert_eq!(as_text(rx_other.recv().await.unwrap()), frame);
    }

    #[tokio::test]
    async fn invalid_add_payload_relays_without_persisting() {
        let state = test_state();
        let mut rx_other = state.relay.add("other".to_string()).await;

        let frame = r#"{"type":"update","action":"add","data":{"name":"Only a name"}}"#;
        handle_message(&state, "sender", frame).await;

        assert_eq!(as_text(rx_other.recv().await.unwrap()), frame);
        let places = state
            .store
            .list_places(&PlaceListParams::default())
            .await
            .unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn refresh_event_updates_the_stored_place() {
        let state = test_state();
        let place = state
            .store
            .create_place(
                parse_place_payload(&json!({
                    "name": "Original",
                    "location": "Here",
                    "rating": 2,
                    "description": "Before"
                }))
                .unwrap(),
            )
            .await
            .unwrap();
        state.relay.add("other".to_string()).await;

        let frame = format!(
            r#"{{"type":"update","action":"refresh","data":{{"id":{},"name":"Original","location":"Here","rating":5,"description":"After"}}}}"#,
            place.id
        );
        handle_message(&state, "sender", &frame).await;

        let updated = state.store.get_place(place.id).await.unwrap().unwrap();
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.description, "After");
    }
}
