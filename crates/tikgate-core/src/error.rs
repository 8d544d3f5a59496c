// ── Core error types ──
//
// User-facing outcomes from tikgate-core. Consumers never see sentence
// framing or socket errors directly. The `From<tikgate_api::Error>` impl
// sorts transport-layer failures into the three device failure classes:
// connectivity, authentication, and device-side rejection.

use thiserror::Error;

/// Why an argument was refused before any device call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid IP '{input}'. Expected four numbers 0-255, e.g. 192.168.1.100")]
    InvalidIp { input: String },

    #[error("Empty command. Usage: terminal /path/to/resource [print]")]
    EmptyTerminal,

    #[error("Command must start with / (e.g., /system/resource), got '{path}'")]
    PathNotRooted { path: String },

    #[error("Dangerous command blocked. Use WebFig for system changes.")]
    DangerousCommand,

    #[error("Action '{action}' not supported. Use: /path/to/resource print")]
    UnsupportedAction { action: String },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Device reachability ──────────────────────────────────────────
    #[error("Router offline: {reason}")]
    Connectivity { reason: String },

    #[error("Router rejected login: {message}")]
    DeviceAuth { message: String },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("Admin only")]
    Authorization,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{what} not found")]
    NotFound { what: String },

    // ── Device-side rejection ────────────────────────────────────────
    #[error("Device error: {message}")]
    DeviceApi { message: String },
}

impl CoreError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tikgate_api::Error> for CoreError {
    fn from(err: tikgate_api::Error) -> Self {
        match err {
            tikgate_api::Error::Authentication { message } => Self::DeviceAuth { message },
            tikgate_api::Error::Trap { message, .. } => Self::DeviceApi { message },
            other if other.is_connectivity() => Self::Connectivity {
                reason: other.to_string(),
            },
            other => Self::DeviceApi {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_distinct_classes() {
        let timeout: CoreError = tikgate_api::Error::Timeout { timeout_secs: 10 }.into();
        assert!(timeout.is_connectivity());

        let auth: CoreError = tikgate_api::Error::Authentication {
            message: "invalid user name or password".into(),
        }
        .into();
        assert!(matches!(auth, CoreError::DeviceAuth { .. }));

        let trap: CoreError = tikgate_api::Error::Trap {
            category: None,
            message: "no such command prefix".into(),
        }
        .into();
        assert!(matches!(trap, CoreError::DeviceApi { ref message } if message == "no such command prefix"));
    }
}
