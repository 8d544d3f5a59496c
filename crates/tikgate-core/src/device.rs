// ── Device provider abstraction ──
//
// The gateway only needs one primitive from the router:
// `call(path, action, params) -> records`. `DeviceLink` is that
// primitive; `Connector` knows how to open (and authenticate) a fresh
// link. The RouterOS implementations live here; tests plug in their own.

use std::future::Future;

use tikgate_api::{ApiClient, Record};

use crate::config::RouterConfig;

/// One open, serially-used channel to the device.
pub trait DeviceLink: Send {
    fn call(
        &mut self,
        path: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<Record>, tikgate_api::Error>> + Send;

    /// `false` once the link has failed and must be replaced.
    fn is_healthy(&self) -> bool;
}

/// Opens new links. Shared by reference across all callers.
pub trait Connector: Send + Sync + 'static {
    type Link: DeviceLink;

    fn connect(&self) -> impl Future<Output = Result<Self::Link, tikgate_api::Error>> + Send;

    /// Human-readable target for logs, e.g. `admin@192.168.88.1:8728`.
    fn describe(&self) -> String;
}

// ── RouterOS ─────────────────────────────────────────────────────────

impl DeviceLink for ApiClient {
    fn call(
        &mut self,
        path: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<Record>, tikgate_api::Error>> + Send {
        ApiClient::call(self, path, action, params)
    }

    fn is_healthy(&self) -> bool {
        ApiClient::is_healthy(self)
    }
}

/// Connects to a RouterOS device over the plaintext API and logs in.
pub struct RouterOsConnector {
    config: RouterConfig,
}

impl RouterOsConnector {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }
}

impl Connector for RouterOsConnector {
    type Link = ApiClient;

    async fn connect(&self) -> Result<ApiClient, tikgate_api::Error> {
        let cfg = &self.config;
        ApiClient::open(
            &cfg.host,
            cfg.port,
            &cfg.username,
            &cfg.password,
            &cfg.transport(),
        )
        .await
    }

    fn describe(&self) -> String {
        format!(
            "{}@{}:{}",
            self.config.username, self.config.host, self.config.port
        )
    }
}
