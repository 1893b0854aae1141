//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`listen`]: WebSocket listener configuration (ListenConfig)
//! - [`limits`]: Bounded-queue capacities (LimitsConfig)

mod limits;
mod listen;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;

use serde::Deserialize;

/// Root configuration, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub listen: ListenConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Server identity and operational settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, reported in logs.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Port for the Prometheus metrics endpoint.
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
