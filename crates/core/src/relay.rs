//! Relay wire protocol.
//!
//! All relay traffic is JSON with a `type` discriminator; `update` messages
//! carry an additional `action` discriminator with either a full place
//! object or a bare id. The server rebroadcasts client-originated `update`
//! frames verbatim, so the payload here is an untyped [`serde_json::Value`]
//! that the persistence path parses into a validated place when needed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::DbId;

/// A message exchanged over the relay WebSocket, in either direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RelayMessage {
    /// Server handshake sent once per connection, immediately after open.
    #[serde(rename = "connected")]
    Connected,

    /// Client request to enable/disable the auto-refresh generator.
    #[serde(rename = "toggle-auto-refresh")]
    ToggleAutoRefresh { enabled: bool },

    /// Server broadcast of the current auto-refresh flag.
    #[serde(rename = "auto-refresh-status")]
    AutoRefreshStatus { enabled: bool },

    /// A catalog mutation, relayed to every other connected client.
    #[serde(rename = "update")]
    Update(UpdateEvent),
}

/// The mutation carried by an `update` message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum UpdateEvent {
    /// A new place was created; `data` is the full place object.
    Add { data: Value },
    /// An existing place changed; `data` is the full updated place object.
    Refresh { data: Value },
    /// A place was removed.
    Delete { id: DbId },
}
