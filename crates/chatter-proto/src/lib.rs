//! Wire protocol for the chatterd relay.
//!
//! Every protocol event travels as one JSON text frame, adjacently tagged
//! on an `event` field with the payload under `data`:
//!
//! ```text
//! {"event":"join","data":"alice"}
//! {"event":"userList","data":["alice","bob"]}
//! ```
//!
//! The enums here are exhaustive: a frame either decodes into a known event
//! or fails with [`ParseError`]. There is no dynamic dispatch on event names
//! anywhere else in the system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when decoding an inbound frame.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The frame was not valid JSON, named an unknown event, or carried a
    /// payload of the wrong shape.
    #[error("malformed event frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Events a client may send to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Announce a display name and enter the roster.
    Join(String),
    /// Broadcast a chat message to everyone connected.
    ChatMessage(String),
}

impl ClientEvent {
    /// Decode a single text frame.
    pub fn decode(frame: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(frame)?)
    }

    /// Static event name, for logging and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::ChatMessage(_) => "chatMessage",
        }
    }
}

/// Events the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A display name entered the chat.
    UserJoined(String),
    /// A display name left the chat.
    UserLeft(String),
    /// Full roster snapshot, in join order. Never a delta.
    UserList(Vec<String>),
    /// A relayed chat message, verbatim.
    ChatMessage(String),
    /// Sent to a single offending connection; never broadcast.
    Error(String),
}

impl ServerEvent {
    /// Encode to a single text frame.
    pub fn encode(&self) -> String {
        // Strings and string lists cannot fail to serialize.
        serde_json::to_string(self).expect("server event serialization")
    }

    /// Static event name, for logging and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserJoined(_) => "userJoined",
            Self::UserLeft(_) => "userLeft",
            Self::UserList(_) => "userList",
            Self::ChatMessage(_) => "chatMessage",
            Self::Error(_) => "error",
        }
    }
}
