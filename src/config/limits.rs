//! Bounded-queue capacity configuration.

use serde::Deserialize;

/// Queue capacities.
///
/// Every queue in the relay is bounded: the coordinator's event queue
/// backpressures the transports, and per-connection send queues cap a slow
/// reader's memory footprint. A connection whose send queue overflows is
/// dropped rather than allowed to stall anyone else.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Outbound queue slots per connection.
    #[serde(default = "default_send_queue")]
    pub send_queue: usize,
    /// Coordinator event queue slots.
    #[serde(default = "default_event_queue")]
    pub event_queue: usize,
    /// Disconnect-request queue slots.
    #[serde(default = "default_disconnect_queue")]
    pub disconnect_queue: usize,
}

fn default_send_queue() -> usize {
    64
}

fn default_event_queue() -> usize {
    1024
}

fn default_disconnect_queue() -> usize {
    1024
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            send_queue: default_send_queue(),
            event_queue: default_event_queue(),
            disconnect_queue: default_disconnect_queue(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_defaults() {
        let cfg = LimitsConfig::default();
        assert_eq!(cfg.send_queue, 64);
        assert_eq!(cfg.event_queue, 1024);
        assert_eq!(cfg.disconnect_queue, 1024);
    }

    #[test]
    fn limits_partial_override() {
        let toml_str = r#"
            send_queue = 8
        "#;
        let cfg: LimitsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.send_queue, 8);
        assert_eq!(cfg.event_queue, 1024); // default
    }
}
