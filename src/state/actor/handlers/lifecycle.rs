//! Connection lifecycle: registration and departure.

use crate::state::actor::SessionActor;
use crate::state::{ConnId, Connection};
use chatter_proto::ServerEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

impl SessionActor {
    /// Register a freshly accepted connection. No broadcast.
    pub(crate) fn handle_connect(
        &mut self,
        conn_id: ConnId,
        sender: mpsc::Sender<Arc<ServerEvent>>,
    ) {
        let connection = Connection::new(conn_id.clone(), sender);
        if let Err(e) = self.registry.insert(connection) {
            // The gateway never reuses ids; seeing this means a bug there.
            error!(%conn_id, error = %e, "Connect rejected");
            crate::metrics::record_event_error("connect", e.error_code());
            return;
        }
        crate::metrics::inc_connected();
        debug!(%conn_id, total = self.registry.len(), "Connection registered");
    }

    /// Remove a connection and, if it was the last bearer of its display
    /// name, announce the departure.
    ///
    /// Absent ids are silent no-ops: the transport's own disconnect races
    /// with overflow-triggered drops.
    pub(crate) fn handle_disconnect(&mut self, conn_id: ConnId) {
        let Some(connection) = self.registry.remove(&conn_id) else {
            return;
        };
        crate::metrics::dec_connected();
        debug!(%conn_id, total = self.registry.len(), "Connection removed");

        // Never joined: nothing was announced, nothing to retract.
        let Some(name) = connection.display_name else {
            return;
        };

        let still_held = self
            .registry
            .snapshot_joined()
            .iter()
            .any(|entry| entry.display_name == name);
        if still_held {
            debug!(name = %name, "Name still held by another connection");
            return;
        }

        self.broadcast(ServerEvent::UserLeft(name));
        self.broadcast_roster();
    }
}
