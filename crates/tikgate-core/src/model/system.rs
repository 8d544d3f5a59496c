// ── System resource, log, interface ──

use serde::Serialize;

/// Snapshot of `/system/resource`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemResource {
    pub cpu_load: Option<String>,
    pub uptime: Option<String>,
    pub free_memory: Option<u64>,
    pub total_memory: Option<u64>,
    pub version: Option<String>,
    pub board_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub time: Option<String>,
    pub topics: Option<String>,
    pub message: Option<String>,
}

/// Interface with cumulative byte counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: Option<String>,
    pub rx_byte: Option<u64>,
    pub tx_byte: Option<u64>,
    pub running: bool,
}
