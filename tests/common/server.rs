//! Test server management.
//!
//! Spawns and manages chatterd instances for integration testing.

use std::process::{Child, Command};
use std::time::Duration;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    // Holds the config file for the child's lifetime.
    _data_dir: tempfile::TempDir,
}

impl TestServer {
    /// Spawn a new test server listening on the given port.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;

        // Minimal test configuration; metrics_port = 0 disables the
        // Prometheus endpoint so parallel tests don't fight over it.
        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.chatterd"
metrics_port = 0

[listen]
address = "127.0.0.1:{port}"

[limits]
send_queue = 64
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_chatterd"))
            .arg(&config_path)
            .spawn()?;

        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..30 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 3 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
