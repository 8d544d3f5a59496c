// ── Routing table ──
//
// Ordered (matcher, builder) pairs, first match wins. Exact matchers
// compare the whole trimmed text case-insensitively against an alias
// set (keywords, slash commands, keyboard labels). Prefix matchers take
// the remainder of the text as the argument without changing its case.

use super::Command;

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    Exact(&'static [&'static str]),
    Prefix(&'static str),
}

impl Matcher {
    /// `Some(argument)` on a match; exact matches carry an empty argument.
    pub fn matches<'t>(&self, text: &'t str) -> Option<&'t str> {
        match self {
            Self::Exact(aliases) => {
                let lowered = text.to_lowercase();
                aliases
                    .iter()
                    .any(|alias| alias.to_lowercase() == lowered)
                    .then_some("")
            }
            Self::Prefix(prefix) => {
                let head = text.get(..prefix.len())?;
                if !head.eq_ignore_ascii_case(prefix) {
                    return None;
                }
                text.get(prefix.len()..).map(str::trim)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub matcher: Matcher,
    pub build: fn(&str) -> Command,
}

const fn exact(aliases: &'static [&'static str], build: fn(&str) -> Command) -> Route {
    Route {
        matcher: Matcher::Exact(aliases),
        build,
    }
}

const fn prefix(prefix: &'static str, build: fn(&str) -> Command) -> Route {
    Route {
        matcher: Matcher::Prefix(prefix),
        build,
    }
}

pub static ROUTES: &[Route] = &[
    exact(&["speed", "/speed", "📊 Speed", "bandwidth", "/bandwidth"], |_| Command::Speed),
    exact(&["devices", "/devices", "📱 Devices"], |_| Command::Devices),
    exact(&["status", "/status", "⚙️ Status"], |_| Command::Status),
    exact(&["top5", "/top5", "🔥 Top5", "top", "/top"], |_| Command::Top),
    exact(&["traffic", "/traffic", "📈 Traffic"], |_| Command::Traffic),
    exact(&["logs", "/logs", "📝 Logs"], |_| Command::Logs),
    exact(&["backup", "/backup", "🗂️ Backup"], |_| Command::Backup),
    exact(&["firewall", "/firewall", "🚫 Firewall"], |_| Command::Firewall),
    exact(&["help", "/help", "❓ Help", "/start"], |_| Command::Help),
    exact(&["terminal", "/terminal", "💻 Terminal"], |_| Command::TerminalUsage),
    exact(&["block", "/block", "🔒 Block IP"], |_| Command::BlockUsage),
    exact(&["unblock", "/unblock", "✅ Unblock IP"], |_| Command::UnblockUsage),
    prefix("block ", |arg| Command::Block(arg.to_owned())),
    prefix("unblock ", |arg| Command::Unblock(arg.to_owned())),
    prefix("terminal ", |arg| Command::Terminal(arg.to_owned())),
];

/// Resolve inbound text to a command. Unrecognized text is `Help`.
pub fn parse(text: &str) -> Command {
    let text = text.trim();
    ROUTES
        .iter()
        .find_map(|route| route.matcher.matches(text).map(route.build))
        .unwrap_or(Command::Help)
}
