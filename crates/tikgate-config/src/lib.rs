//! Configuration for the tikgate gateway.
//!
//! Layered loading (defaults, TOML file, `TIKGATE_` environment), router
//! password resolution, and translation into `tikgate_core::GatewayConfig`.
//! The binary applies its command-line overrides on top of [`Config`]
//! before calling [`to_gateway_config`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tikgate_core::{
    AccessConfig, EmptyAdminPolicy, FirewallConfig, GatewayConfig, RankSide, RouterConfig,
};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `TIKGATE_ROUTER__HOST`.
pub const ENV_PREFIX: &str = "TIKGATE_";

/// Fallback variable holding the router password.
pub const PASSWORD_ENV: &str = "TIKGATE_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no router password configured (set router.password, router.password_env or TIKGATE_PASSWORD)")]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterSection,

    #[serde(default)]
    pub access: AccessSection,

    #[serde(default)]
    pub firewall: FirewallSection,

    #[serde(default)]
    pub ranking: RankingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouterSection {
    /// Router address. Required before anything can connect.
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password (prefer `password_env`).
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            username: default_username(),
            password: None,
            password_env: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            connect_attempts: default_connect_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_port() -> u16 {
    RouterConfig::default().port
}
fn default_username() -> String {
    "admin".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_connect_timeout_secs() -> u64 {
    5
}
fn default_connect_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessSection {
    /// Caller ids allowed to run privileged commands.
    #[serde(default)]
    pub admin_ids: Vec<i64>,

    /// Required when `admin_ids` is empty: `everyone` or `nobody`.
    pub empty_admin_policy: Option<EmptyAdminPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FirewallSection {
    #[serde(default = "default_block_list")]
    pub block_list: String,

    #[serde(default = "default_block_comment")]
    pub block_comment: String,
}

impl Default for FirewallSection {
    fn default() -> Self {
        Self {
            block_list: default_block_list(),
            block_comment: default_block_comment(),
        }
    }
}

fn default_block_list() -> String {
    FirewallConfig::default().block_list
}
fn default_block_comment() -> String {
    FirewallConfig::default().block_comment
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RankingSection {
    /// Which byte counter ranks the top consumers.
    #[serde(default)]
    pub side: RankSide,
}

impl Config {
    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.router.password.is_some() {
            copy.router.password = Some("********".into());
        }
        copy
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "tikgate", "tikgate").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tikgate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the platform config path and environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` and environment. A missing file is not an error:
/// defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Render config as TOML (callers redact first when showing it).
pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Write the starter template to `path`, creating parent dirs. An
/// existing file is left alone unless `overwrite` is set.
pub fn init_config(path: &Path, overwrite: bool) -> Result<(), ConfigError> {
    if path.exists() && !overwrite {
        return Err(ConfigError::Validation {
            field: "config".into(),
            reason: format!("{} already exists", path.display()),
        });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, template())?;
    Ok(())
}

/// Starter file written by `config init`.
pub fn template() -> &'static str {
    r#"# tikgate configuration

[router]
host = "192.168.88.1"
port = 8728
username = "admin"
# Prefer an environment variable over a plaintext password.
password_env = "MIKROTIK_PASSWORD"
timeout_secs = 10
connect_attempts = 3
retry_delay_ms = 500

[access]
# Caller ids allowed to run backup, firewall, block/unblock and terminal.
admin_ids = []
# What an empty admin_ids means: "everyone" or "nobody".
empty_admin_policy = "nobody"

[firewall]
block_list = "blocked"
block_comment = "blocked-by-bot"

[ranking]
# "download" or "upload"
side = "download"
"#
}

// ── Credential resolution ───────────────────────────────────────────

/// Router password: `password_env` variable, then `TIKGATE_PASSWORD`,
/// then the plaintext `password` key.
pub fn resolve_password(router: &RouterSection) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(ref env_name) = router.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = router.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials)
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate and build the runtime gateway configuration.
pub fn to_gateway_config(cfg: &Config) -> Result<GatewayConfig, ConfigError> {
    let host = cfg
        .router
        .host
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ConfigError::Validation {
            field: "router.host".into(),
            reason: "no router address configured".into(),
        })?;

    if cfg.router.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            field: "router.timeout_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let admin_ids: BTreeSet<i64> = cfg.access.admin_ids.iter().copied().collect();
    let empty_policy = match cfg.access.empty_admin_policy {
        Some(policy) => policy,
        // A non-empty allow-list never consults the policy.
        None if !admin_ids.is_empty() => EmptyAdminPolicy::Nobody,
        None => {
            return Err(ConfigError::Validation {
                field: "access.empty_admin_policy".into(),
                reason: "admin_ids is empty; set empty_admin_policy to \"everyone\" or \"nobody\""
                    .into(),
            });
        }
    };

    let router = RouterConfig {
        host: host.to_owned(),
        port: cfg.router.port,
        username: cfg.router.username.clone(),
        password: resolve_password(&cfg.router)?,
        timeout: Duration::from_secs(cfg.router.timeout_secs),
        connect_timeout: Duration::from_secs(cfg.router.connect_timeout_secs.max(1)),
        connect_attempts: cfg.router.connect_attempts.max(1),
        retry_delay: Duration::from_millis(cfg.router.retry_delay_ms),
    };

    Ok(GatewayConfig {
        router,
        access: AccessConfig {
            admin_ids,
            empty_policy,
        },
        firewall: FirewallConfig {
            block_list: cfg.firewall.block_list.clone(),
            block_comment: cfg.firewall.block_comment.clone(),
        },
        rank_side: cfg.ranking.side,
    })
}
