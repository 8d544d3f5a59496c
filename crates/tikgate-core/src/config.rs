// ── Runtime gateway configuration ──
//
// These types describe *how* to reach the router and *who* may run
// privileged commands. They carry credential data but never touch disk.
// The binary builds a `GatewayConfig` (via tikgate-config) and hands it in.

use std::collections::BTreeSet;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use tikgate_api::{DEFAULT_API_PORT, TransportConfig};

/// Where the router lives and how to log in.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Bound on every request/response exchange.
    pub timeout: Duration,
    /// Bound on TCP connect.
    pub connect_timeout: Duration,
    /// Connection attempts per `acquire()` before giving up.
    pub connect_attempts: u32,
    /// Delay between connection attempts (multiplied by the attempt number).
    pub retry_delay: Duration,
}

impl RouterConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            connect_timeout: self.connect_timeout,
            timeout: self.timeout,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: "192.168.88.1".into(),
            port: DEFAULT_API_PORT,
            username: "admin".into(),
            password: SecretString::from(String::new()),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            connect_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// What an empty admin set means. No `Default`:
/// the choice must be written down in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmptyAdminPolicy {
    /// Every caller is privileged (single-operator deployments).
    Everyone,
    /// Nobody is privileged; only read-only commands work.
    Nobody,
}

/// Privileged caller ids plus the pinned empty-set policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    pub admin_ids: BTreeSet<i64>,
    pub empty_policy: EmptyAdminPolicy,
}

/// Address-list settings used by `block` / `unblock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallConfig {
    pub block_list: String,
    pub block_comment: String,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            block_list: "blocked".into(),
            block_comment: "blocked-by-bot".into(),
        }
    }
}

/// Which half of a queue's `"<upload>/<download>"` byte counter ranks
/// the top consumers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RankSide {
    Upload,
    #[default]
    Download,
}

/// Everything the gateway needs.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub router: RouterConfig,
    pub access: AccessConfig,
    pub firewall: FirewallConfig,
    pub rank_side: RankSide,
}
