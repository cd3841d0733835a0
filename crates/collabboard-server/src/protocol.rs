//! Relay wire messages.
//!
//! The relay never looks inside a drawing payload: `data` is kept as raw JSON and
//! forwarded as received.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Join a room
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// Segment to forward to the room
    Drawing {
        #[serde(rename = "roomId")]
        room_id: String,
        data: Value,
    },
    /// Clear to forward to the room
    ClearCanvas {
        #[serde(rename = "roomId")]
        room_id: String,
    },
}

/// A message forwarded to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Segment drawn by another member
    Drawing { data: Value },
    /// Another member cleared the board
    ClearCanvas,
}
