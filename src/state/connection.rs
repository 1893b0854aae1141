//! A single client connection as the registry sees it.

use crate::state::ConnId;
use chatter_proto::ServerEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Lifecycle state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Transport is up; no display name announced yet.
    Connecting,
    /// Display name announced; visible in the roster.
    Joined,
    /// Terminal. Entries reach this state only as they leave the registry.
    Closed,
}

/// One live connection. Owned exclusively by the registry; no other
/// component holds a long-lived reference.
pub struct Connection {
    pub conn_id: ConnId,
    pub display_name: Option<String>,
    pub state: ConnState,
    /// Bounded outbound queue handle; the connection task drains it to the
    /// socket. Dropping this (by removing the entry) ends that task.
    pub sender: mpsc::Sender<Arc<ServerEvent>>,
    /// Monotonic join sequence, set on the Connecting -> Joined transition.
    /// Orders the roster projection.
    pub joined_at: Option<u64>,
}

impl Connection {
    /// Create a fresh Connecting entry.
    pub fn new(conn_id: ConnId, sender: mpsc::Sender<Arc<ServerEvent>>) -> Self {
        Self {
            conn_id,
            display_name: None,
            state: ConnState::Connecting,
            sender,
            joined_at: None,
        }
    }

    pub fn is_joined(&self) -> bool {
        self.state == ConnState::Joined
    }
}
