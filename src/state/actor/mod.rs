//! Actor model for session state management.
//!
//! This module implements the `SessionActor`, which owns the connection
//! registry and processes every join/message/disconnect event sequentially
//! in an isolated Tokio task.
//!
//! # Architecture
//!
//! - **State Ownership**: The `SessionActor` owns the registry outright;
//!   I/O tasks hold no references to it.
//! - **Message Passing**: All interactions happen via `SessionEvent`
//!   messages sent to the actor.
//! - **Ordering**: Events are processed strictly in arrival order, so no
//!   two mutations interleave and every roster broadcast reflects exactly
//!   the mutation that triggered it.

use crate::config::LimitsConfig;
use crate::state::{ConnId, Registry};
use tokio::sync::mpsc;

mod handlers;
mod types;

pub use types::SessionEvent;

/// The session coordinator.
///
/// Owns the registry and processes events sequentially.
pub struct SessionActor {
    registry: Registry,
    disconnect_tx: mpsc::Sender<(ConnId, String)>,
}

impl SessionActor {
    /// Create a new session actor and spawn it onto its own task.
    ///
    /// Returns the sender that transports use to submit events. The channel
    /// is bounded; transports await on it, which backpressures clients
    /// instead of buffering without limit.
    pub fn spawn(
        limits: &LimitsConfig,
        disconnect_tx: mpsc::Sender<(ConnId, String)>,
    ) -> mpsc::Sender<SessionEvent> {
        let (tx, rx) = mpsc::channel(limits.event_queue);

        let actor = Self {
            registry: Registry::new(),
            disconnect_tx,
        };

        tokio::spawn(async move {
            actor.run(rx).await;
        });

        tx
    }

    /// The main actor loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<SessionEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        let _timer = crate::telemetry::EventTimer::new(event.name());
        match event {
            SessionEvent::Connect { conn_id, sender } => self.handle_connect(conn_id, sender),
            SessionEvent::Join { conn_id, name } => self.handle_join(conn_id, name),
            SessionEvent::Message { conn_id, text } => self.handle_message(conn_id, text),
            SessionEvent::Disconnect { conn_id } => self.handle_disconnect(conn_id),
        }
    }

    /// Ask the disconnect worker to drop a connection.
    ///
    /// The worker re-submits the drop as a regular `Disconnect` event, so it
    /// is processed in order and never reentrantly. try_send: if the worker
    /// is overwhelmed the request is dropped; the connection task's own
    /// Disconnect still arrives eventually.
    fn request_disconnect(&self, conn_id: &str, reason: &str) {
        let _ = self
            .disconnect_tx
            .try_send((conn_id.to_string(), reason.to_string()));
    }
}
