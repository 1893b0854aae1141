//! Chat message relay.

use crate::error::SessionError;
use crate::state::ConnId;
use crate::state::actor::SessionActor;
use chatter_proto::ServerEvent;

impl SessionActor {
    /// Relay a chat message to everyone, sender included.
    ///
    /// The text is forwarded verbatim: no transformation, no filtering, no
    /// persistence. Senders that never joined are rejected.
    pub(crate) fn handle_message(&mut self, conn_id: ConnId, text: String) {
        if !self.registry.is_joined(&conn_id) {
            self.reject(&conn_id, "message", SessionError::NotJoined);
            return;
        }
        self.broadcast(ServerEvent::ChatMessage(text));
    }
}
