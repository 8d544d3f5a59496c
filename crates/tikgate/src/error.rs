//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use tikgate_config::ConfigError;
use tikgate_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device ───────────────────────────────────────────────────────
    #[error("Could not reach the router: {reason}")]
    #[diagnostic(
        code(tikgate::connection_failed),
        help(
            "Check that the API service is enabled (/ip service enable api)\n\
             and that host/port in your config are correct."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Router rejected login: {message}")]
    #[diagnostic(
        code(tikgate::auth_failed),
        help(
            "Verify router.username and the password source\n\
             (router.password_env, TIKGATE_PASSWORD or router.password)."
        )
    )]
    AuthFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(tikgate::device))]
    Device { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(tikgate::validation),
        help("Create or edit the config file with: tikgate config init")
    )]
    Validation { field: String, reason: String },

    #[error("No router password configured")]
    #[diagnostic(
        code(tikgate::no_credentials),
        help("Set router.password_env in the config file, or export TIKGATE_PASSWORD.")
    )]
    NoCredentials,

    #[error(transparent)]
    #[diagnostic(code(tikgate::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(tikgate::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(tikgate::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connectivity { reason } => Self::ConnectionFailed { reason },
            CoreError::DeviceAuth { message } => Self::AuthFailed { message },
            other => Self::Device {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials => Self::NoCredentials,
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
