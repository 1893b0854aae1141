//! chatterd - presence-tracking chat relay daemon.
//!
//! Clients connect over WebSocket, announce a display name, and exchange
//! broadcast messages. A single coordinator task owns all session state.

mod config;
mod error;
mod http;
mod metrics;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::actor::{SessionActor, SessionEvent};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        description = %config.server.description,
        "Starting chatterd"
    );

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port.unwrap_or(9090);
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        metrics::init();
        info!("Metrics initialized");

        tokio::spawn(async move {
            http::run_http_server(metrics_port).await;
        });
        info!(port = metrics_port, "Prometheus HTTP server started");
    }

    // Disconnect worker: the coordinator requests drops (send-queue
    // overflow) through this channel instead of reentering its own event
    // processing. Bounded so a disconnect storm cannot grow memory.
    let (disconnect_tx, mut disconnect_rx) =
        tokio::sync::mpsc::channel::<(String, String)>(config.limits.disconnect_queue);

    let events = SessionActor::spawn(&config.limits, disconnect_tx);
    info!("Session actor started");

    {
        let events = events.clone();
        tokio::spawn(async move {
            while let Some((conn_id, reason)) = disconnect_rx.recv().await {
                warn!(%conn_id, %reason, "Dropping connection");
                let _ = events.send(SessionEvent::Disconnect { conn_id }).await;
            }
        });
    }

    // Start the Gateway
    let gateway = Gateway::bind(config.listen, config.limits.send_queue, events).await?;
    gateway.run().await?;

    Ok(())
}
