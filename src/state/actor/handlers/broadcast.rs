//! Event fan-out to connected clients.

use crate::error::SessionError;
use crate::state::actor::SessionActor;
use crate::state::roster::project_roster;
use chatter_proto::ServerEvent;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

impl SessionActor {
    /// Deliver an event to every live connection.
    ///
    /// The recipient list is snapshotted before sending, so delivery never
    /// observes a registry mutation mid-iteration. A full queue costs that
    /// recipient its connection; other recipients are unaffected.
    pub(crate) fn broadcast(&self, event: ServerEvent) {
        let event = Arc::new(event);
        let recipients = self.registry.senders();
        crate::metrics::record_fanout(recipients.len());

        for (conn_id, sender) in recipients {
            if let Err(err) = sender.try_send(Arc::clone(&event)) {
                match err {
                    TrySendError::Full(_) => {
                        crate::metrics::inc_send_queue_dropped();
                        self.request_disconnect(&conn_id, "send queue exceeded");
                    }
                    // The connection task already exited; its own
                    // Disconnect event is in flight.
                    TrySendError::Closed(_) => {}
                }
            } else {
                crate::metrics::inc_sent();
            }
        }
    }

    /// Broadcast the current roster snapshot.
    pub(crate) fn broadcast_roster(&self) {
        let roster = project_roster(&self.registry.snapshot_joined());
        crate::metrics::set_roster_size(roster.len());
        self.broadcast(ServerEvent::UserList(roster));
    }

    /// Send an event to a single connection.
    pub(crate) fn send_to(&self, conn_id: &str, event: ServerEvent) {
        let Some(sender) = self.registry.sender(conn_id) else {
            return;
        };
        if let Err(err) = sender.try_send(Arc::new(event)) {
            match err {
                TrySendError::Full(_) => {
                    crate::metrics::inc_send_queue_dropped();
                    self.request_disconnect(conn_id, "send queue exceeded");
                }
                TrySendError::Closed(_) => {}
            }
        } else {
            crate::metrics::inc_sent();
        }
    }

    /// Record a rejected event and surface it to the offender where the
    /// protocol allows a reply.
    pub(crate) fn reject(&self, conn_id: &str, event: &str, error: SessionError) {
        crate::metrics::record_event_error(event, error.error_code());
        debug!(%conn_id, error = %error, "Event rejected");
        if let Some(reply) = error.to_client_reply() {
            self.send_to(conn_id, reply);
        }
    }
}
