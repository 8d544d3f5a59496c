// ── Reply rendering ──
//
// Pure functions from typed model values to reply text. Missing fields
// render as `?`; nothing here can fail.

use std::fmt::Write as _;

use crate::error::{CoreError, ValidationError};
use crate::format::{humanize_bytes, humanize_rate, truncate_chars};
use crate::model::{CounterPair, FilterRule, Interface, Lease, LogEntry, Queue, SystemResource};
use crate::names::{NameMap, lease_display_name};
use crate::ranking::Ranked;

pub const SPEED_LIMIT: usize = 10;
pub const DEVICE_LIMIT: usize = 15;
pub const LOG_LIMIT: usize = 5;
pub const FIREWALL_LIMIT: usize = 10;
pub const INTERFACE_LIMIT: usize = 8;

const LOG_MESSAGE_CHARS: usize = 40;
const RULE_COMMENT_CHARS: usize = 25;
const DEVICE_ERROR_CHARS: usize = 80;
const TERMINAL_ERROR_CHARS: usize = 100;

/// Sent when a handler panicked.
pub const GENERIC_FAILURE: &str = "❌ Error occurred";

pub const TERMINAL_USAGE: &str = "💻 Terminal Mode\n\n\
    Send commands like:\n\
    /system/resource\n\
    /ip/address print\n\
    /interface print\n\n\
    Example:\n\
    terminal /system/resource";

pub const BLOCK_USAGE: &str = "🔒 Block IP\n\nSend:\nblock 192.168.1.100";
pub const UNBLOCK_USAGE: &str = "✅ Unblock IP\n\nSend:\nunblock 192.168.1.100";

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or("?")
}

fn bytes_or_unknown(value: Option<u64>) -> String {
    value.map_or_else(|| "?".into(), humanize_bytes)
}

fn rate_pair(rate: Option<CounterPair>) -> String {
    rate.map_or_else(
        || "?".into(),
        |r| format!("↑{} ↓{}", humanize_rate(r.upload), humanize_rate(r.download)),
    )
}

// ── Bandwidth ────────────────────────────────────────────────────────

pub fn render_speed(queues: &[Queue], names: &NameMap) -> String {
    if queues.is_empty() {
        return "📊 No bandwidth data".into();
    }
    let mut msg = String::from("📊 Current Bandwidth:\n\n");
    for (i, queue) in queues.iter().take(SPEED_LIMIT).enumerate() {
        let name = names.resolve(queue.target.as_deref(), &queue.name);
        let _ = writeln!(msg, "{}. {name}: {}", i + 1, rate_pair(queue.rate));
    }
    msg
}

pub fn render_top(ranked: &[Ranked]) -> String {
    if ranked.is_empty() {
        return "🔥 No data".into();
    }
    let mut msg = String::from("🔥 Top 5 Consumers:\n\n");
    for (i, row) in ranked.iter().enumerate() {
        let _ = writeln!(
            msg,
            "{}. {}: {} ({})",
            i + 1,
            row.name,
            humanize_bytes(row.bytes),
            rate_pair(row.rate)
        );
    }
    msg
}

// ── DHCP ─────────────────────────────────────────────────────────────

/// Bound leases only, in device order.
pub fn render_devices(leases: &[Lease]) -> String {
    let bound: Vec<&Lease> = leases
        .iter()
        .filter(|l| l.is_bound())
        .take(DEVICE_LIMIT)
        .collect();
    if bound.is_empty() {
        return "📱 No devices connected".into();
    }
    let mut msg = format!("📱 Connected Devices ({}):\n\n", bound.len());
    for (i, lease) in bound.iter().enumerate() {
        let _ = writeln!(
            msg,
            "{}. {} → {}",
            i + 1,
            lease_display_name(lease),
            or_unknown(lease.address.as_deref())
        );
    }
    msg
}

// ── System ───────────────────────────────────────────────────────────

pub fn render_status(resource: &SystemResource) -> String {
    let mut msg = String::from("⚙️ Router Status:\n\n");
    let _ = writeln!(msg, "CPU: {}%", or_unknown(resource.cpu_load.as_deref()));
    let _ = writeln!(msg, "Uptime: {}", or_unknown(resource.uptime.as_deref()));
    let _ = writeln!(
        msg,
        "Memory: {} free / {}",
        bytes_or_unknown(resource.free_memory),
        bytes_or_unknown(resource.total_memory)
    );
    let _ = writeln!(msg, "Version: {}", or_unknown(resource.version.as_deref()));
    let _ = writeln!(msg, "Board: {}", or_unknown(resource.board_name.as_deref()));
    msg
}

/// The newest `LOG_LIMIT` entries (the device lists oldest first).
pub fn render_logs(logs: &[LogEntry]) -> String {
    if logs.is_empty() {
        return "📝 No logs".into();
    }
    let mut msg = String::from("📝 Last Logs:\n\n");
    let start = logs.len().saturating_sub(LOG_LIMIT);
    for entry in &logs[start..] {
        let message = truncate_chars(or_unknown(entry.message.as_deref()), LOG_MESSAGE_CHARS);
        let _ = writeln!(msg, "[{}] {message}", or_unknown(entry.time.as_deref()));
    }
    msg
}

pub fn render_traffic(interfaces: &[Interface]) -> String {
    if interfaces.is_empty() {
        return "📈 No interfaces".into();
    }
    let mut msg = String::from("📈 Interface Traffic:\n\n");
    for iface in interfaces.iter().take(INTERFACE_LIMIT) {
        let _ = writeln!(
            msg,
            "{}: ↓{} ↑{}",
            or_unknown(iface.name.as_deref()),
            bytes_or_unknown(iface.rx_byte),
            bytes_or_unknown(iface.tx_byte)
        );
    }
    msg
}

// ── Firewall ─────────────────────────────────────────────────────────

pub fn render_firewall(rules: &[FilterRule]) -> String {
    if rules.is_empty() {
        return "🚫 No rules".into();
    }
    let mut msg = String::from("🚫 Firewall Rules:\n\n");
    for (i, rule) in rules.iter().take(FIREWALL_LIMIT).enumerate() {
        let action = or_unknown(rule.action.as_deref()).to_uppercase();
        let proto = rule.protocol.as_deref().unwrap_or("any");
        let comment = truncate_chars(rule.comment.as_deref().unwrap_or("rule"), RULE_COMMENT_CHARS);
        let disabled = if rule.disabled { " (disabled)" } else { "" };
        let _ = writeln!(msg, "{}. [{action}] {proto}: {comment}{disabled}", i + 1);
    }
    msg
}

// ── Help ─────────────────────────────────────────────────────────────

pub fn render_help(is_admin: bool) -> String {
    let mut msg = String::from(
        "📚 MikroTik Bot Commands:\n\n\
         📊 Speed - Bandwidth\n\
         📱 Devices - DHCP list\n\
         ⚙️ Status - Router info\n\
         🔥 Top5 - Top consumers\n\
         📈 Traffic - Interface stats\n\
         📝 Logs - System logs\n",
    );
    if is_admin {
        msg.push_str(
            "\n🔒 Admin:\n\
             🗂️ Backup - Save config\n\
             🚫 Firewall - View rules\n\
             🔒 Block/Unblock IP\n\
             💻 Terminal - Run commands\n\n\
             Format:\n\
             block 192.168.1.100\n\
             terminal /system/resource\n\
             terminal /ip/address print\n",
        );
    }
    msg
}

// ── Errors ───────────────────────────────────────────────────────────

/// User-facing text for a failed command.
pub fn render_error(err: &CoreError) -> String {
    match err {
        CoreError::Connectivity { .. } => "❌ Router offline".into(),
        CoreError::DeviceAuth { .. } => {
            "❌ Router rejected the gateway's credentials. Check the configured API user.".into()
        }
        CoreError::Authorization => "🔒 Admin only".into(),
        CoreError::Validation(ValidationError::DangerousCommand) => {
            format!("🔒 {}", ValidationError::DangerousCommand)
        }
        CoreError::Validation(v) => format!("❌ {v}"),
        CoreError::NotFound { what } => format!("❌ {what} not found"),
        CoreError::DeviceApi { message } => {
            format!("❌ Error: {}", truncate_chars(message, DEVICE_ERROR_CHARS))
        }
    }
}

/// Terminal replies carry up to 100 characters of a device rejection.
pub fn render_terminal_error(err: &CoreError) -> String {
    match err {
        CoreError::DeviceApi { message } => {
            format!("❌ Command error: {}", truncate_chars(message, TERMINAL_ERROR_CHARS))
        }
        other => render_error(other),
    }
}
