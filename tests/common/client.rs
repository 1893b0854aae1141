//! Test WebSocket client.
//!
//! Sends protocol events and asserts on received server events.

use chatter_proto::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// A test chat client.
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let (stream, _response) = connect_async(format!("ws://{address}")).await?;
        Ok(Self { stream })
    }

    /// Send a client event.
    pub async fn send(&mut self, event: ClientEvent) -> anyhow::Result<()> {
        let frame = serde_json::to_string(&event)?;
        self.stream.send(WsMessage::Text(frame)).await?;
        Ok(())
    }

    /// Send a raw text frame (for malformed-input tests).
    pub async fn send_raw(&mut self, frame: &str) -> anyhow::Result<()> {
        self.stream.send(WsMessage::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Receive a single server event.
    pub async fn recv(&mut self) -> anyhow::Result<ServerEvent> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a server event with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<ServerEvent> {
        loop {
            let frame = timeout(dur, self.stream.next())
                .await?
                .ok_or_else(|| anyhow::anyhow!("connection closed"))??;

            match frame {
                WsMessage::Text(text) => {
                    return serde_json::from_str(&text)
                        .map_err(|e| anyhow::anyhow!("parse error: {e}"));
                }
                // Control frames are transparent to the protocol.
                WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
                other => anyhow::bail!("unexpected frame: {other:?}"),
            }
        }
    }

    /// Receive events until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<ServerEvent>>
    where
        F: FnMut(&ServerEvent) -> bool,
    {
        let mut events = Vec::new();
        loop {
            let event = self.recv().await?;
            let done = predicate(&event);
            events.push(event);
            if done {
                break;
            }
        }
        Ok(events)
    }

    /// Join the chat and wait for the resulting roster snapshot.
    #[allow(dead_code)]
    pub async fn join(&mut self, name: &str) -> anyhow::Result<()> {
        self.send(ClientEvent::Join(name.to_string())).await?;
        self.recv_until(|event| matches!(event, ServerEvent::UserList(_)))
            .await?;
        Ok(())
    }

    /// Close the connection.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
