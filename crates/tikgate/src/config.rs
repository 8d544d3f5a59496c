//! CLI-aware configuration: the config file plus `GlobalOpts` overrides.

use std::path::PathBuf;

use tikgate_config::Config;
use tikgate_core::GatewayConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// `--config` if given, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(tikgate_config::config_path)
}

/// Load file + environment, then apply command-line overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = tikgate_config::load_config_from(&config_path(global))?;

    if let Some(ref host) = global.host {
        cfg.router.host = Some(host.clone());
    }
    if let Some(port) = global.port {
        cfg.router.port = port;
    }
    if let Some(ref username) = global.username {
        cfg.router.username.clone_from(username);
    }
    if let Some(timeout) = global.timeout {
        cfg.router.timeout_secs = timeout;
    }
    Ok(cfg)
}

pub fn gateway_config(global: &GlobalOpts) -> Result<GatewayConfig, CliError> {
    let cfg = load(global)?;
    Ok(tikgate_config::to_gateway_config(&cfg)?)
}
