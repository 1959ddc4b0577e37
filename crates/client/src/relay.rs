//! Relay WebSocket client with capped-backoff reconnection.

use std::collections::VecDeque;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use placemark_core::relay::RelayMessage;

/// Reconnection attempts before giving up on live updates.
const MAX_RECONNECT_ATTEMPTS: u32 = 5;
/// First reconnection delay; doubles per attempt.
const BASE_BACKOFF: Duration = Duration::from_secs(1);
/// Backoff ceiling.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Handle to a background relay connection.
///
/// Outgoing messages sent while disconnected are buffered and flushed on
/// (re)connect. Inbound messages arrive on the receiver returned by
/// [`connect`](Self::connect). After `MAX_RECONNECT_ATTEMPTS` consecutive
/// connection failures the task exits and the receiver closes; the session
/// continues without live updates.
pub struct RelayClient {
    outbound: mpsc::UnboundedSender<RelayMessage>,
    task: JoinHandle<()>,
}

impl RelayClient {
    /// Spawn the connection task for a relay URL, e.g.
    /// `ws://127.0.0.1:3000/ws`.
    pub fn connect(url: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<RelayMessage>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(url.into(), outbound_rx, event_tx));
        (
            Self {
                outbound: outbound_tx,
                task,
            },
            event_rx,
        )
    }

    /// Queue a message for the relay. Never blocks; if the connection task
    /// has given up, the message is dropped.
    pub fn send(&self, message: RelayMessage) {
        let _ = self.outbound.send(message);
    }

    pub fn toggle_auto_refresh(&self, enabled: bool) {
        self.send(RelayMessage::ToggleAutoRefresh { enabled });
    }

    /// Stop the connection task.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

/// Delay before reconnection attempt `n` (1-based): `min(1s * 2^(n-1), 30s)`.
fn backoff_delay(attempt: u32) -> Duration {
    let exp = BASE_BACKOFF.saturating_mul(1u32 << (attempt - 1).min(16));
    exp.min(MAX_BACKOFF)
}

async fn run(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<RelayMessage>,
    events: mpsc::UnboundedSender<RelayMessage>,
) {
    let mut pending: VecDeque<String> = VecDeque::new();
    let mut attempts: u32 = 0;

    loop {
        let ws_stream = match connect_async(&url).await {
            Ok((ws_stream, _response)) => {
                tracing::info!(url = %url, "Relay connected");
                attempts = 0;
                ws_stream
            }
            Err(e) => {
                attempts += 1;
                if attempts >= MAX_RECONNECT_ATTEMPTS {
                    tracing::warn!(error = %e, attempts, "Relay unreachable, giving up on live updates");
                    return;
                }
                let delay = backoff_delay(attempts);
                tracing::debug!(error = %e, attempt = attempts, ?delay, "Relay connect failed, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        let (mut sink, mut stream) = ws_stream.split();

        // Flush messages queued while disconnected, oldest first.
        let mut flush_failed = false;
        while let Some(frame) = pending.pop_front() {
            if let Err(e) = sink.send(Message::Text(frame.clone())).await {
                tracing::debug!(error = %e, "Flush failed, keeping message queued");
                pending.push_front(frame);
                flush_failed = true;
                break;
            }
        }
        if flush_failed {
            continue;
        }

        // Pump until either direction fails, then fall back to reconnect.
        loop {
            tokio::select! {
                to_send = outbound.recv() => {
                    let Some(message) = to_send else {
                        // Handle dropped; close the session and exit.
                        let _ = sink.send(Message::Close(None)).await;
                        return;
                    };
                    let frame = match serde_json::to_string(&message) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!(error = %e, "Dropping unserializable relay message");
                            continue;
                        }
                    };
                    if let Err(e) = sink.send(Message::Text(frame.clone())).await {
                        tracing::debug!(error = %e, "Relay send failed, queueing for reconnect");
                        pending.push_back(frame);
                        break;
                    }
                }
                received = stream.next() => {
                    match received {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<RelayMessage>(&text) {
                                Ok(message) => {
                                    if events.send(message).is_err() {
                                        // Nobody listening anymore.
                                        return;
                                    }
                                }
                                Err(e) => {
                                    tracing::debug!(error = %e, "Ignoring unrecognized relay frame");
                                }
                            }
                        }
                        Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                            // Handled automatically by tungstenite.
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::info!(?frame, "Relay closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {
                            // Binary / Frame carry no relay traffic.
                        }
                        Some(Err(e)) => {
                            tracing::debug!(error = %e, "Relay receive error");
                            break;
                        }
                        None => {
                            tracing::debug!("Relay stream exhausted");
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
        assert_eq!(backoff_delay(5), Duration::from_secs(16));
        assert_eq!(backoff_delay(6), Duration::from_secs(30));
        assert_eq!(backoff_delay(60), Duration::from_secs(30));
    }
}
