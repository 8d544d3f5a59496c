// ── Commands ──
//
// `Command` is what inbound text parses into. Parsing is table-driven
// (see `table`) and does no I/O; the gateway executes the result.

mod table;

pub use table::{Matcher, ROUTES, Route, parse};

use strum::IntoStaticStr;

/// One recognized command. Arguments keep the caller's original case.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Speed,
    Devices,
    Status,
    Top,
    Traffic,
    Logs,
    Backup,
    Firewall,
    Help,
    TerminalUsage,
    BlockUsage,
    UnblockUsage,
    Block(String),
    Unblock(String),
    Terminal(String),
}

impl Command {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Commands that require the caller to pass the admin gate.
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Self::Backup | Self::Firewall | Self::Block(_) | Self::Unblock(_) | Self::Terminal(_)
        )
    }
}
