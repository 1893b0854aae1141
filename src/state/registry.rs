//! The Connection Registry: single source of truth for live connections.
//!
//! Owned exclusively by the session actor and mutated only on its task, so
//! every read here is a consistent point-in-time snapshot; no caller can
//! observe a half-applied mutation.

use crate::error::SessionError;
use crate::state::{ConnId, ConnState, Connection};
use chatter_proto::ServerEvent;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of a join, so the controller can suppress duplicate broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First transition to Joined; worth announcing.
    Joined,
    /// Repeat join with the same name; nothing to announce.
    AlreadyJoined,
    /// Join with a different name after joining. Renames are unsupported;
    /// the original name stands.
    RenameIgnored,
}

/// A Joined connection as seen by the presence projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedEntry {
    pub display_name: String,
    pub joined_at: u64,
}

/// Mapping from connection identity to live connection.
#[derive(Default)]
pub struct Registry {
    connections: HashMap<ConnId, Connection>,
    join_seq: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Add a new Connecting entry.
    ///
    /// Duplicate identities should never occur under correct transport
    /// semantics, but are checked and rejected.
    pub fn insert(&mut self, connection: Connection) -> Result<(), SessionError> {
        if self.connections.contains_key(&connection.conn_id) {
            return Err(SessionError::DuplicateIdentity(connection.conn_id.clone()));
        }
        self.connections
            .insert(connection.conn_id.clone(), connection);
        Ok(())
    }

    /// Transition a connection to Joined with the given display name.
    ///
    /// Requires a live entry and a non-empty name. Idempotent for a repeat
    /// join with the same name.
    pub fn mark_joined(&mut self, conn_id: &str, name: &str) -> Result<JoinOutcome, SessionError> {
        if name.is_empty() {
            return Err(SessionError::InvalidJoin);
        }

        let connection = self
            .connections
            .get_mut(conn_id)
            .ok_or_else(|| SessionError::UnknownConnection(conn_id.to_string()))?;

        match connection.state {
            ConnState::Connecting => {
                connection.display_name = Some(name.to_string());
                connection.state = ConnState::Joined;
                connection.joined_at = Some(self.join_seq);
                self.join_seq += 1;
                Ok(JoinOutcome::Joined)
            }
            ConnState::Joined => {
                if connection.display_name.as_deref() == Some(name) {
                    Ok(JoinOutcome::AlreadyJoined)
                } else {
                    Ok(JoinOutcome::RenameIgnored)
                }
            }
            // Closed entries leave the map immediately; a lookup cannot see one.
            ConnState::Closed => Err(SessionError::UnknownConnection(conn_id.to_string())),
        }
    }

    /// Delete an entry regardless of state, returning it.
    ///
    /// Absent identities are a silent no-op: disconnect events race with
    /// other cleanup.
    pub fn remove(&mut self, conn_id: &str) -> Option<Connection> {
        let mut connection = self.connections.remove(conn_id)?;
        connection.state = ConnState::Closed;
        Some(connection)
    }

    /// Whether the connection exists and is Joined.
    pub fn is_joined(&self, conn_id: &str) -> bool {
        self.connections
            .get(conn_id)
            .is_some_and(Connection::is_joined)
    }

    /// Point-in-time snapshot of all Joined connections, in join order.
    pub fn snapshot_joined(&self) -> Vec<JoinedEntry> {
        let mut joined: Vec<JoinedEntry> = self
            .connections
            .values()
            .filter(|c| c.is_joined())
            .filter_map(|c| {
                Some(JoinedEntry {
                    display_name: c.display_name.clone()?,
                    joined_at: c.joined_at?,
                })
            })
            .collect();
        joined.sort_by_key(|entry| entry.joined_at);
        joined
    }

    /// Outbound handles of every live connection, for broadcast fan-out.
    pub fn senders(&self) -> Vec<(ConnId, mpsc::Sender<Arc<ServerEvent>>)> {
        self.connections
            .iter()
            .map(|(conn_id, c)| (conn_id.clone(), c.sender.clone()))
            .collect()
    }

    /// Outbound handle of a single connection, for direct replies.
    pub fn sender(&self, conn_id: &str) -> Option<mpsc::Sender<Arc<ServerEvent>>> {
        self.connections.get(conn_id).map(|c| c.sender.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(conn_id: &str) -> Connection {
        let (tx, _rx) = mpsc::channel(8);
        Connection::new(conn_id.to_string(), tx)
    }

    #[test]
    fn insert_rejects_duplicate_identity() {
        let mut registry = Registry::new();
        registry.insert(entry("AAAAAA")).unwrap();
        let err = registry.insert(entry("AAAAAA")).unwrap_err();
        assert!(matches!(err, SessionError::DuplicateIdentity(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn mark_joined_rejects_empty_name() {
        let mut registry = Registry::new();
        registry.insert(entry("AAAAAA")).unwrap();
        let err = registry.mark_joined("AAAAAA", "").unwrap_err();
        assert!(matches!(err, SessionError::InvalidJoin));
        assert!(!registry.is_joined("AAAAAA"));
        assert!(registry.snapshot_joined().is_empty());
    }

    #[test]
    fn mark_joined_rejects_unknown_connection() {
        let mut registry = Registry::new();
        let err = registry.mark_joined("AAAAAA", "alice").unwrap_err();
        assert!(matches!(err, SessionError::UnknownConnection(_)));
    }

    #[test]
    fn mark_joined_is_idempotent_for_same_name() {
        let mut registry = Registry::new();
        registry.insert(entry("AAAAAA")).unwrap();
        assert_eq!(
            registry.mark_joined("AAAAAA", "alice").unwrap(),
            JoinOutcome::Joined
        );
        assert_eq!(
            registry.mark_joined("AAAAAA", "alice").unwrap(),
            JoinOutcome::AlreadyJoined
        );
        assert_eq!(registry.snapshot_joined().len(), 1);
    }

    #[test]
    fn mark_joined_ignores_rename() {
        let mut registry = Registry::new();
        registry.insert(entry("AAAAAA")).unwrap();
        registry.mark_joined("AAAAAA", "alice").unwrap();
        assert_eq!(
            registry.mark_joined("AAAAAA", "bob").unwrap(),
            JoinOutcome::RenameIgnored
        );
        let snapshot = registry.snapshot_joined();
        assert_eq!(snapshot[0].display_name, "alice");
    }

    #[test]
    fn remove_absent_is_a_noop() {
        let mut registry = Registry::new();
        assert!(registry.remove("AAAAAA").is_none());
    }

    #[test]
    fn remove_returns_closed_entry() {
        let mut registry = Registry::new();
        registry.insert(entry("AAAAAA")).unwrap();
        registry.mark_joined("AAAAAA", "alice").unwrap();
        let removed = registry.remove("AAAAAA").unwrap();
        assert_eq!(removed.state, ConnState::Closed);
        assert_eq!(removed.display_name.as_deref(), Some("alice"));
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_joined_orders_by_join_sequence() {
        let mut registry = Registry::new();
        for conn_id in ["AAAAAC", "AAAAAB", "AAAAAA"] {
            registry.insert(entry(conn_id)).unwrap();
        }
        registry.mark_joined("AAAAAC", "carol").unwrap();
        registry.mark_joined("AAAAAA", "alice").unwrap();
        registry.mark_joined("AAAAAB", "bob").unwrap();

        let names: Vec<String> = registry
            .snapshot_joined()
            .into_iter()
            .map(|e| e.display_name)
            .collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn snapshot_joined_skips_connecting_entries() {
        let mut registry = Registry::new();
        registry.insert(entry("AAAAAA")).unwrap();
        registry.insert(entry("AAAAAB")).unwrap();
        registry.mark_joined("AAAAAA", "alice").unwrap();

        assert_eq!(registry.snapshot_joined().len(), 1);
        assert_eq!(registry.senders().len(), 2); // fan-out still reaches both
    }
}
