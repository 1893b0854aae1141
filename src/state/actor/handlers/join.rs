//! Join handling: roster entry and arrival announcements.

use crate::state::ConnId;
use crate::state::actor::SessionActor;
use crate::state::registry::JoinOutcome;
use chatter_proto::ServerEvent;
use tracing::{debug, warn};

impl SessionActor {
    /// Handle a join: mark the connection Joined and announce it.
    ///
    /// The arrival broadcast is followed by a full roster snapshot, in that
    /// order, within this one event. Nothing can interleave between them.
    pub(crate) fn handle_join(&mut self, conn_id: ConnId, name: String) {
        match self.registry.mark_joined(&conn_id, &name) {
            Ok(JoinOutcome::Joined) => {
                debug!(%conn_id, name = %name, "Client joined");
                self.broadcast(ServerEvent::UserJoined(name));
                self.broadcast_roster();
            }
            Ok(JoinOutcome::AlreadyJoined) => {
                debug!(%conn_id, "Repeat join ignored");
            }
            Ok(JoinOutcome::RenameIgnored) => {
                warn!(%conn_id, name = %name, "Rename after join is not supported");
            }
            Err(e) => self.reject(&conn_id, "join", e),
        }
    }
}
