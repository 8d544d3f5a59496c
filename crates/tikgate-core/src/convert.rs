// ── Record-to-model conversions ──
//
// The single place where raw device attributes become typed values.
// Blank or whitespace-only strings become `None`, numbers that fail to
// parse become `None`, and RouterOS booleans (`true`/`yes`) become `bool`.
// Renderers decide how to show what is missing.

use tikgate_api::Record;

use crate::error::CoreError;
use crate::model::{
    AddressListEntry, CounterPair, EntryId, FilterRule, Interface, Lease, LeaseStatus, LogEntry,
    Queue, SystemResource,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Trimmed attribute value, or `None` when absent or blank.
fn text(record: &Record, key: &str) -> Option<String> {
    record
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn number(record: &Record, key: &str) -> Option<u64> {
    record.get(key).and_then(|v| v.trim().parse().ok())
}

fn flag(record: &Record, key: &str) -> bool {
    record
        .get(key)
        .is_some_and(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
}

/// First entry of a queue `target` (`"10.0.0.5/32,10.0.0.6/32"`), with a
/// host-length prefix stripped so it can be matched against lease addresses.
fn primary_target(raw: &str) -> Option<String> {
    let first = raw.split(',').next()?.trim();
    let first = first.strip_suffix("/32").unwrap_or(first);
    (!first.is_empty()).then(|| first.to_owned())
}

// ── DHCP ─────────────────────────────────────────────────────────────

impl From<&Record> for Lease {
    fn from(record: &Record) -> Self {
        Self {
            address: text(record, "address"),
            mac_address: text(record, "mac-address"),
            host_name: text(record, "host-name"),
            comment: text(record, "comment"),
            status: LeaseStatus::parse(record.get("status").unwrap_or_default().trim()),
        }
    }
}

// ── Queues ───────────────────────────────────────────────────────────

impl From<&Record> for Queue {
    fn from(record: &Record) -> Self {
        Self {
            name: text(record, "name").unwrap_or_else(|| "?".into()),
            target: record.get("target").and_then(primary_target),
            rate: record.get("rate").and_then(CounterPair::parse),
            bytes: record.get("bytes").and_then(CounterPair::parse),
        }
    }
}

// ── Firewall ─────────────────────────────────────────────────────────

impl TryFrom<&Record> for AddressListEntry {
    type Error = CoreError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let id = text(record, ".id").ok_or_else(|| CoreError::DeviceApi {
            message: "address-list entry without .id".into(),
        })?;
        Ok(Self {
            id: EntryId::from_device(id),
            list: text(record, "list").unwrap_or_default(),
            address: text(record, "address").unwrap_or_default(),
            comment: text(record, "comment"),
        })
    }
}

impl From<&Record> for FilterRule {
    fn from(record: &Record) -> Self {
        Self {
            chain: text(record, "chain"),
            action: text(record, "action"),
            protocol: text(record, "protocol"),
            comment: text(record, "comment"),
            disabled: flag(record, "disabled"),
        }
    }
}

// ── System ───────────────────────────────────────────────────────────

impl From<&Record> for SystemResource {
    fn from(record: &Record) -> Self {
        Self {
            cpu_load: text(record, "cpu-load"),
            uptime: text(record, "uptime"),
            free_memory: number(record, "free-memory"),
            total_memory: number(record, "total-memory"),
            version: text(record, "version"),
            board_name: text(record, "board-name"),
        }
    }
}

impl From<&Record> for LogEntry {
    fn from(record: &Record) -> Self {
        Self {
            time: text(record, "time"),
            topics: text(record, "topics"),
            message: text(record, "message"),
        }
    }
}

impl From<&Record> for Interface {
    fn from(record: &Record) -> Self {
        Self {
            name: text(record, "name"),
            rx_byte: number(record, "rx-byte"),
            tx_byte: number(record, "tx-byte"),
            running: flag(record, "running"),
        }
    }
}
