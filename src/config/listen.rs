//! Network listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// WebSocket listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:3000").
    pub address: SocketAddr,
    /// Allowed origins for the WebSocket handshake (e.g., `["https://example.com"]`).
    /// Empty list allows all origins.
    #[serde(default)]
    pub allow_origins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_config_deserialize_defaults() {
        let toml_str = r#"
            address = "0.0.0.0:3000"
        "#;
        let cfg: ListenConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.address.port(), 3000);
        assert!(cfg.allow_origins.is_empty()); // default
    }

    #[test]
    fn listen_config_with_origins() {
        let toml_str = r#"
            address = "0.0.0.0:3000"
            allow_origins = ["https://example.com", "https://another.com"]
        "#;
        let cfg: ListenConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.allow_origins.len(), 2);
        assert_eq!(cfg.allow_origins[0], "https://example.com");
    }
}
