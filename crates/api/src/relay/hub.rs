use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};

/// Outbound queue capacity per connection.
///
/// Drop policy: when a client's queue is full, new events are dropped for
/// that client (drop-newest) and a warning is logged. Other clients are
/// unaffected.
const QUEUE_CAPACITY: usize = 64;

/// Metadata for a single relay connection.
struct RelayConnection {
    /// Bounded channel for outbound messages to this connection.
    sender: mpsc::Sender<Message>,
}

/// Tracks all active relay connections and the global auto-refresh flag.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct RelayHub {
    connections: RwLock<HashMap<String, RelayConnection>>,
    auto_refresh: AtomicBool,
}

impl RelayHub {
    /// Create a new, empty hub with auto-refresh disabled.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            auto_refresh: AtomicBool::new(false),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the bounded message channel so the
    /// caller can forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        self.connections
            .write()
            .await
            .insert(conn_id, RelayConnection { sender: tx });
        rx
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Whether the auto-refresh generator is currently enabled.
    pub fn auto_refresh_enabled(&self) -> bool {
        self.auto_refresh.load(Ordering::Relaxed)
    }

    /// Set the global auto-refresh flag.
    pub fn set_auto_refresh(&self, enabled: bool) {
        self.auto_refresh.store(enabled, Ordering::Relaxed);
    }

    /// Queue a message for a single connection.
    pub async fn send_to(&self, conn_id: &str, message: Message) {
        let conns = self.connections.read().await;
        if let Some(conn) = conns.get(conn_id) {
            Self::queue(conn_id, conn, message);
        }
    }

    /// Broadcast a message to all connected clients.
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for (conn_id, conn) in conns.iter() {
            Self::queue(conn_id, conn, message.clone());
        }
    }

    /// Broadcast a message to every connection except `sender_id`.
    ///
    /// Used to relay client-originated mutation events to the *other* tabs.
    pub async fn broadcast_except(&self, sender_id: &str, message: Message) {
        let conns = self.connections.read().await;
        for (conn_id, conn) in conns.iter() {
            if conn_id != sender_id {
                Self::queue(conn_id, conn, message.clone());
            }
        }
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for (conn_id, conn) in conns.iter() {
            Self::queue(conn_id, conn, Message::Ping(Bytes::new()));
        }
    }

    /// Spawn a background task that pings every connection at `interval`,
    /// keeping idle sockets alive through proxies. The returned `JoinHandle`
    /// is used to abort the task at shutdown.
    pub fn start_heartbeat(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let hub = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let count = hub.connection_count().await;
                tracing::debug!(count, "Relay heartbeat ping");
                hub.ping_all().await;
            }
        })
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for (conn_id, conn) in conns.iter() {
            Self::queue(conn_id, conn, Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all relay connections");
    }

    /// Enqueue without blocking. A full queue drops the message for that
    /// client; a closed queue means the connection is mid-teardown and will
    /// be removed by its own cleanup path.
    fn queue(conn_id: &str, conn: &RelayConnection, message: Message) {
        match conn.sender.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %conn_id, "Relay queue full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new()
    }
}
