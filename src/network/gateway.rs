//! Gateway - TCP listener that accepts incoming WebSocket connections.
//!
//! The Gateway binds the listen socket, performs the WebSocket handshake
//! with an Origin allowlist check, and spawns a Connection task for each
//! accepted client.

use crate::config::ListenConfig;
use crate::network::Connection;
use crate::state::ConnIdGenerator;
use crate::state::actor::SessionEvent;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tracing::{error, info, instrument, warn};

/// The Gateway accepts incoming connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    allow_origins: Vec<String>,
    events: mpsc::Sender<SessionEvent>,
    conn_ids: ConnIdGenerator,
    send_queue: usize,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(
        config: ListenConfig,
        send_queue: usize,
        events: mpsc::Sender<SessionEvent>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.address).await?;
        info!(address = %config.address, "WebSocket listener bound");

        Ok(Self {
            listener,
            allow_origins: config.allow_origins,
            events,
            conn_ids: ConnIdGenerator::new(),
            send_queue,
        })
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "Connection attempt");

                    let conn_id = self.conn_ids.next();
                    let events = self.events.clone();
                    let allowed = self.allow_origins.clone();
                    let send_queue = self.send_queue;

                    tokio::spawn(async move {
                        // Origin validation callback for the WebSocket handshake
                        let origin_callback =
                            |req: &http::Request<()>, response: http::Response<()>| {
                                // If allow_origins is empty, allow all origins
                                if allowed.is_empty() {
                                    return Ok(response);
                                }

                                if let Some(origin) =
                                    req.headers().get("Origin").and_then(|o| o.to_str().ok())
                                {
                                    if allowed.iter().any(|a| a == origin || a == "*") {
                                        return Ok(response);
                                    }
                                    warn!(%addr, origin = %origin, "WebSocket origin rejected");
                                }

                                // Reject with 403 Forbidden
                                Err(http::Response::builder()
                                    .status(http::StatusCode::FORBIDDEN)
                                    .body(Some("Origin not allowed".to_string()))
                                    .unwrap())
                            };

                        match accept_hdr_async(stream, origin_callback).await {
                            Ok(ws_stream) => {
                                info!(%conn_id, %addr, "WebSocket handshake successful");
                                let connection = Connection::new(
                                    conn_id.clone(),
                                    ws_stream,
                                    addr,
                                    events,
                                    send_queue,
                                );
                                if let Err(e) = connection.run().await {
                                    error!(%conn_id, %addr, error = %e, "Connection error");
                                }
                                info!(%conn_id, %addr, "Connection closed");
                            }
                            Err(e) => {
                                warn!(%addr, error = %e, "WebSocket handshake failed");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
