// RouterOS API client
//
// Wraps one framed TCP connection with request/response sequencing,
// per-exchange timeouts, and reply classification. A connection carries
// exactly one exchange at a time; `&mut self` on every call enforces that.
// An exchange that does not finish (error, timeout or a dropped future)
// leaves the connection unhealthy.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::proto::{Reply, Sentence, SentenceCodec};
use crate::record::Record;
use crate::transport::TransportConfig;

/// A single authenticated-or-not API connection to a RouterOS device.
///
/// After any connectivity-class failure (timeout, I/O error, `!fatal`,
/// framing error) or an abandoned exchange the connection is marked
/// unhealthy and refuses further exchanges; the caller is expected to open
/// a fresh one.
pub struct ApiClient {
    framed: Framed<TcpStream, SentenceCodec>,
    addr: String,
    timeout: Duration,
    healthy: bool,
}

impl ApiClient {
    /// Connect to `host:port` (no login yet).
    pub async fn connect(host: &str, port: u16, transport: &TransportConfig) -> Result<Self, Error> {
        let stream = transport.open_stream(host, port).await?;
        Ok(Self::from_stream(stream, format!("{host}:{port}"), transport.timeout))
    }

    /// Wrap an already-connected stream.
    pub fn from_stream(stream: TcpStream, addr: String, timeout: Duration) -> Self {
        Self {
            framed: Framed::new(stream, SentenceCodec),
            addr,
            timeout,
            healthy: true,
        }
    }

    /// The `host:port` this client talks to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// `false` once the connection has failed and must be replaced.
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Scope calls to one menu path, e.g. `/ip/dhcp-server/lease`.
    pub fn resource(&mut self, path: &str) -> Resource<'_> {
        Resource {
            client: self,
            path: path.trim_end_matches('/').to_owned(),
        }
    }

    /// Run `{path}/{action}` with `=key=value` parameters and collect
    /// every `!re` record up to `!done`.
    pub async fn call(
        &mut self,
        path: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Record>, Error> {
        let command = format!("{}/{action}", path.trim_end_matches('/'));
        let sentence = params
            .iter()
            .fold(Sentence::command(command), |s, (k, v)| s.attr(k, v));
        let (records, _done) = self.exchange(sentence).await?;
        Ok(records)
    }

    /// Send one sentence and read replies through `!done`, bounded by
    /// the configured timeout. Returns the records and the `!done`
    /// attributes.
    pub(crate) async fn exchange(&mut self, sentence: Sentence) -> Result<(Vec<Record>, Record), Error> {
        if !self.healthy {
            return Err(Error::Closed);
        }

        // Unhealthy until the reply is read through `!done`. If this future
        // is dropped mid-exchange, unread replies stay on the socket and the
        // connection must not be reused.
        self.healthy = false;

        let timeout = self.timeout;
        let result = match tokio::time::timeout(timeout, self.exchange_inner(sentence)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                timeout_secs: timeout.as_secs(),
            }),
        };

        match result {
            Err(ref e) if e.is_connectivity() => {
                warn!(addr = %self.addr, error = %e, "API connection marked unhealthy");
            }
            _ => self.healthy = true,
        }
        result
    }

    async fn exchange_inner(&mut self, sentence: Sentence) -> Result<(Vec<Record>, Record), Error> {
        debug!(command = sentence.head().unwrap_or_default(), "API request");
        self.framed.send(sentence).await?;

        let mut records = Vec::new();
        let mut trap = None;
        loop {
            let sentence = self.framed.next().await.ok_or(Error::Closed)??;
            trace!(words = ?sentence.words(), "API reply");

            match Reply::try_from(sentence)? {
                Reply::Re(record) => records.push(record),
                Reply::Empty => {}
                // The device still sends `!done` after a trap; keep reading
                // so the next exchange starts on a clean boundary.
                Reply::Trap { category, message } => {
                    trap.get_or_insert(Error::Trap { category, message });
                }
                Reply::Fatal(message) => return Err(Error::Fatal { message }),
                Reply::Done(done) => {
                    return match trap {
                        Some(err) => Err(err),
                        None => Ok((records, done)),
                    };
                }
            }
        }
    }
}

/// A menu path bound to a client: `resource(path).call(action, params)`.
pub struct Resource<'a> {
    client: &'a mut ApiClient,
    path: String,
}

impl Resource<'_> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn call(&mut self, action: &str, params: &[(&str, &str)]) -> Result<Vec<Record>, Error> {
        self.client.call(&self.path, action, params).await
    }

    /// `print` with no arguments.
    pub async fn print(&mut self) -> Result<Vec<Record>, Error> {
        self.call("print", &[]).await
    }
}
