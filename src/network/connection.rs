//! Connection - handles an individual client over WebSocket.
//!
//! Each Connection runs in its own Tokio task with a unified loop:
//!
//! ```text
//!    ┌───────────────────────────────────────────────────┐
//!    │                 Connection Task                   │
//!    │                                                   │
//!    │  ws frames ──► decode ──► SessionEvent ──► actor  │
//!    │                                                   │
//!    │  socket ◄── encode ◄── outbound queue ◄── actor   │
//!    └───────────────────────────────────────────────────┘
//! ```
//!
//! The task holds no session state. Inbound frames become events for the
//! session actor; outbound events arrive on a bounded queue filled by the
//! actor's fan-out. When the actor drops our queue handle (send-queue
//! overflow policy), the loop ends and the socket closes.

use crate::error::SessionError;
use crate::state::ConnId;
use crate::state::actor::SessionEvent;
use chatter_proto::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, instrument, warn};

/// A client connection handler.
pub struct Connection {
    conn_id: ConnId,
    addr: SocketAddr,
    stream: WebSocketStream<TcpStream>,
    events: mpsc::Sender<SessionEvent>,
    send_queue: usize,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        conn_id: ConnId,
        stream: WebSocketStream<TcpStream>,
        addr: SocketAddr,
        events: mpsc::Sender<SessionEvent>,
        send_queue: usize,
    ) -> Self {
        Self {
            conn_id,
            addr,
            stream,
            events,
            send_queue,
        }
    }

    /// Run the connection loop until the client goes away.
    #[instrument(skip(self), fields(conn_id = %self.conn_id, addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            conn_id,
            addr: _,
            stream,
            events,
            send_queue,
        } = self;

        info!("Client connected");

        // Bounded outbound queue. The actor fills it with try_send and
        // drops us on overflow; this task only drains it.
        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<Arc<ServerEvent>>(send_queue);

        events
            .send(SessionEvent::Connect {
                conn_id: conn_id.clone(),
                sender: outgoing_tx,
            })
            .await
            .map_err(SessionError::from)?;

        let (mut sink, mut source) = stream.split();

        loop {
            tokio::select! {
                // BRANCH A: inbound frames from the client
                inbound = source.next() => {
                    match inbound {
                        Some(Ok(WsMessage::Text(frame))) => {
                            match ClientEvent::decode(&frame) {
                                Ok(event) => {
                                    debug!(event = event.name(), "Received event");
                                    let event = match event {
                                        ClientEvent::Join(name) => SessionEvent::Join {
                                            conn_id: conn_id.clone(),
                                            name,
                                        },
                                        ClientEvent::ChatMessage(text) => SessionEvent::Message {
                                            conn_id: conn_id.clone(),
                                            text,
                                        },
                                    };
                                    if events.send(event).await.is_err() {
                                        warn!("Session actor is gone");
                                        break;
                                    }
                                }
                                Err(e) => {
                                    // Recoverable: reply with an error event
                                    // and keep reading.
                                    warn!(error = %e, "Undecodable frame");
                                    let reply = ServerEvent::Error(format!("unrecognized event: {e}"));
                                    if sink.send(WsMessage::Text(reply.encode())).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                        Some(Ok(WsMessage::Binary(_))) => {
                            warn!("Binary frame rejected");
                            let reply = ServerEvent::Error("binary frames are not supported".to_string());
                            if sink.send(WsMessage::Text(reply.encode())).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(WsMessage::Ping(payload))) => {
                            if sink.send(WsMessage::Pong(payload)).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(WsMessage::Pong(_))) => {}
                        Some(Ok(WsMessage::Close(_))) => {
                            info!("Client sent close");
                            break;
                        }
                        // Raw frames never surface from a read.
                        Some(Ok(WsMessage::Frame(_))) => {}
                        Some(Err(e)) => {
                            debug!(error = %e, "Read error");
                            break;
                        }
                        None => {
                            info!("Client disconnected");
                            break;
                        }
                    }
                }

                // BRANCH B: outbound events from the session actor
                outbound = outgoing_rx.recv() => {
                    match outbound {
                        Some(event) => {
                            if let Err(e) = sink.send(WsMessage::Text(event.encode())).await {
                                warn!(error = %e, "Write error");
                                break;
                            }
                        }
                        // The actor dropped our sender: send-queue overflow
                        // disconnect. Queued events were drained above.
                        None => {
                            info!("Dropped by coordinator");
                            break;
                        }
                    }
                }
            }
        }

        // Always deregister. Repeated disconnects for the same id are
        // silent no-ops upstream, so racing the overflow path is fine.
        let _ = events
            .send(SessionEvent::Disconnect {
                conn_id: conn_id.clone(),
            })
            .await;

        Ok(())
    }
}
