// Shared transport configuration for opening RouterOS API connections.
//
// Keeps connect/exchange timeouts in one place so every connection the
// session layer opens is bounded the same way.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::error::Error;

/// Default plaintext RouterOS API port.
pub const DEFAULT_API_PORT: u16 = 8728;

/// Shared transport configuration for device connections.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Bound on TCP connect.
    pub connect_timeout: Duration,
    /// Bound on a single request/response exchange.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Open a TCP stream to `host:port` within `connect_timeout`.
    pub async fn open_stream(&self, host: &str, port: u16) -> Result<TcpStream, Error> {
        let addr = format!("{host}:{port}");
        debug!(%addr, "opening API connection");

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| Error::Connect {
                addr: addr.clone(),
                reason: format!("timed out after {}s", self.connect_timeout.as_secs()),
            })?
            .map_err(|e| Error::Connect {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;

        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
