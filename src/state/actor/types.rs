//! Session events: what the coordinator can be asked to process.

use crate::state::ConnId;
use chatter_proto::ServerEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events that can be sent to the session actor.
///
/// One tagged union covers every inbound event; the actor handles it with a
/// single exhaustive match, strictly in arrival order.
#[derive(Debug)]
pub enum SessionEvent {
    /// Transport-level connect. Registers the connection's outbound queue.
    Connect {
        conn_id: ConnId,
        sender: mpsc::Sender<Arc<ServerEvent>>,
    },
    /// Client announced a display name.
    Join { conn_id: ConnId, name: String },
    /// Client sent a chat message.
    Message { conn_id: ConnId, text: String },
    /// Transport closed, I/O failed, or the send queue overflowed.
    Disconnect { conn_id: ConnId },
}

impl SessionEvent {
    /// Static event name, for logging and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Join { .. } => "join",
            Self::Message { .. } => "message",
            Self::Disconnect { .. } => "disconnect",
        }
    }
}
