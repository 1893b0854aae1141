//! State management module.
//!
//! Contains the connection registry, the presence projection, and the
//! session actor that owns them.

pub mod actor;
mod conn_id;
mod connection;
pub mod registry;
pub mod roster;

pub use conn_id::{ConnId, ConnIdGenerator};
pub use connection::{ConnState, Connection};
pub use registry::Registry;
