//! Per-event handlers for the session actor.

mod broadcast;
mod join;
mod lifecycle;
mod message;
