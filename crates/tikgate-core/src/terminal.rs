// ── Terminal passthrough ──
//
// A constrained read-only window into the device's resource tree.
// `TerminalQuery::parse` is the whole validation pipeline and performs
// no I/O, so a rejected query never reaches the device (or the admin
// check, which runs after it).

use std::fmt::Write as _;

use tikgate_api::Record;

use crate::error::ValidationError;
use crate::format::truncate_chars;

/// Substrings that reject a query outright, wherever they appear.
pub const DANGEROUS_VERBS: [&str; 5] = ["reboot", "reset", "shutdown", "remove", "delete"];

const DEFAULT_ACTION: &str = "print";
const PREVIEW_RECORDS: usize = 5;
const PREVIEW_FIELDS: usize = 5;
const VALUE_CHARS: usize = 50;
const HIDDEN_FIELDS: [&str; 2] = [".id", ".path"];

/// A validated `path [action]` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalQuery {
    pub path: String,
    pub action: String,
}

impl TerminalQuery {
    /// Validate raw terminal input, in order: non-empty, rooted path,
    /// deny-list scan of the whole input, supported action.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let mut parts = input.split_whitespace();
        let path = parts.next().ok_or(ValidationError::EmptyTerminal)?;
        let action = parts.next().unwrap_or(DEFAULT_ACTION);

        if !path.starts_with('/') {
            return Err(ValidationError::PathNotRooted { path: path.into() });
        }

        let lowered = input.to_lowercase();
        if DANGEROUS_VERBS.iter().any(|verb| lowered.contains(verb)) {
            return Err(ValidationError::DangerousCommand);
        }

        if action != DEFAULT_ACTION {
            return Err(ValidationError::UnsupportedAction {
                action: action.into(),
            });
        }

        Ok(Self {
            path: path.into(),
            action: action.into(),
        })
    }
}

/// Preview of a `print` result: the first few records, each limited to
/// its first few visible fields.
pub fn render_records(path: &str, records: &[Record]) -> String {
    if records.is_empty() {
        return format!("No data from {path}");
    }

    let mut msg = format!("📟 {path}\n\n");
    for (i, record) in records.iter().take(PREVIEW_RECORDS).enumerate() {
        let _ = writeln!(msg, "─ Entry {}:", i + 1);
        record
            .iter()
            .filter(|(key, _)| !HIDDEN_FIELDS.contains(key))
            .take(PREVIEW_FIELDS)
            .for_each(|(key, value)| {
                let _ = writeln!(msg, "  {key}: {}", truncate_chars(value, VALUE_CHARS));
            });
        msg.push('\n');
    }
    if records.len() > PREVIEW_RECORDS {
        let _ = write!(msg, "... and {} more entries", records.len() - PREVIEW_RECORDS);
    }
    msg
}
