//! Unified error handling for chatterd.
//!
//! Session errors carry a static code for metric labeling and can be turned
//! into a client-visible reply where the protocol allows one.

use crate::state::actor::SessionEvent;
use chatter_proto::ServerEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while processing a session event.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Registry invariant violation: the gateway handed out an identity that
    /// is already live. Must never happen under correct transport semantics.
    #[error("duplicate connection identity: {0}")]
    DuplicateIdentity(String),

    /// Join with an empty display name.
    #[error("invalid join: empty display name")]
    InvalidJoin,

    /// Chat message from a connection that never joined.
    #[error("not joined")]
    NotJoined,

    /// Event referenced a connection the registry no longer holds.
    /// Disconnects race with other cleanup, so this is expected noise.
    #[error("unknown connection: {0}")]
    UnknownConnection(String),

    #[error("session event channel closed")]
    Send(#[from] mpsc::error::SendError<SessionEvent>),
}

impl SessionError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateIdentity(_) => "duplicate_identity",
            Self::InvalidJoin => "invalid_join",
            Self::NotJoined => "not_joined",
            Self::UnknownConnection(_) => "unknown_connection",
            Self::Send(_) => "send_error",
        }
    }

    /// Convert to a client-visible error event.
    ///
    /// Returns `None` for errors that don't warrant a reply to the client
    /// (internal invariants, races, channel failures).
    pub fn to_client_reply(&self) -> Option<ServerEvent> {
        match self {
            Self::InvalidJoin => Some(ServerEvent::Error(
                "join requires a non-empty name".to_string(),
            )),
            Self::NotJoined => Some(ServerEvent::Error(
                "join before sending messages".to_string(),
            )),

            // These errors don't get client-visible replies
            Self::DuplicateIdentity(_) => None,
            Self::UnknownConnection(_) => None,
            Self::Send(_) => None,
        }
    }
}
