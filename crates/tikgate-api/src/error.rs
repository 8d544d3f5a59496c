use thiserror::Error;

/// Top-level error type for the `tikgate-api` crate.
///
/// Covers every failure mode of a RouterOS API session: connecting,
/// framing, authentication, and device-side rejections (`!trap`).
/// `tikgate-core` maps these into user-facing outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// TCP connect failed (refused, unreachable, DNS failure, etc.)
    #[error("Cannot connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },

    /// I/O error on an established connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An exchange did not complete in time.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The device closed the connection mid-exchange.
    #[error("Connection closed by device")]
    Closed,

    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, user disabled, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Device replies ──────────────────────────────────────────────
    /// `!trap` reply: the device refused the command (unknown path,
    /// unsupported action, invalid argument, duplicate entry...).
    #[error("Device error: {message}")]
    Trap {
        category: Option<u32>,
        message: String,
    },

    /// `!fatal` reply: the device is about to drop the connection.
    #[error("Fatal device error: {message}")]
    Fatal { message: String },

    // ── Framing ─────────────────────────────────────────────────────
    /// Malformed frame or an unexpected reply word.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns `true` if the connection is unusable after this error and
    /// must be re-established.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. }
                | Self::Io(_)
                | Self::Timeout { .. }
                | Self::Closed
                | Self::Fatal { .. }
                | Self::Protocol(_)
        )
    }

    /// Returns `true` if the device rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` for a device-side rejection of a well-formed request.
    pub fn is_trap(&self) -> bool {
        matches!(self, Self::Trap { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_disjoint() {
        let cases = [
            Error::Closed,
            Error::Timeout { timeout_secs: 5 },
            Error::Authentication {
                message: "invalid user name or password".into(),
            },
            Error::Trap {
                category: Some(0),
                message: "no such command".into(),
            },
        ];

        for err in &cases {
            let flags = [err.is_connectivity(), err.is_auth(), err.is_trap()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{err:?}");
        }
    }
}
