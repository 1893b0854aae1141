//! Presence projection: the roster of visible display names.
//!
//! The roster is derived from a registry snapshot, never stored. Presence is
//! tracked per connection, not per name: two connections may share a display
//! name, the roster carries one entry for it, and the entry survives until
//! the last bearer is gone.

use crate::state::registry::JoinedEntry;
use std::collections::HashSet;

/// Distinct display names among Joined connections, in join order.
///
/// The snapshot arrives sorted by join sequence; the first bearer of a name
/// fixes its roster position.
pub fn project_roster(joined: &[JoinedEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut roster = Vec::new();
    for entry in joined {
        if seen.insert(entry.display_name.as_str()) {
            roster.push(entry.display_name.clone());
        }
    }
    roster
}
