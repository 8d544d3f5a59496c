// ── Display-name resolution ──
//
// Queues only know a target address; people know their devices by the
// name written on the DHCP lease. `NameMap` joins the two.
//
// The join is best-effort: leases and queues are read with separate
// calls, so a lease may change between the two reads. A stale or
// missing lease just means the queue shows under its own name.

use std::collections::HashMap;

use crate::format::truncate_chars;
use crate::model::Lease;

/// Longest MAC representation shown when a lease has no better name.
const MAC_DISPLAY_CHARS: usize = 17;

/// Pick the name to show: comment, then hostname, then `fallback`, then `?`.
/// Blank candidates are skipped; the result is never empty.
pub fn display_name(comment: Option<&str>, host_name: Option<&str>, fallback: &str) -> String {
    [comment, host_name, Some(fallback)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or("?")
        .to_owned()
}

/// Name for a lease row in the device listing.
pub fn lease_display_name(lease: &Lease) -> String {
    let mac = lease.mac_address.as_deref().unwrap_or_default();
    display_name(
        lease.comment.as_deref(),
        lease.host_name.as_deref(),
        truncate_chars(mac, MAC_DISPLAY_CHARS),
    )
}

/// Address -> label lookup built once per command from one lease snapshot.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    by_address: HashMap<String, String>,
}

impl NameMap {
    /// Only leases with both an address and a label contribute.
    pub fn from_leases(leases: &[Lease]) -> Self {
        let by_address = leases
            .iter()
            .filter_map(|lease| {
                let address = lease.address.as_deref()?;
                let label = lease.label()?;
                Some((address.to_owned(), label.to_owned()))
            })
            .collect();
        Self { by_address }
    }

    /// Label for `address`, else `fallback`, else `?`.
    pub fn resolve(&self, address: Option<&str>, fallback: &str) -> String {
        let label = address.and_then(|a| self.by_address.get(a)).map(String::as_str);
        display_name(label, None, fallback)
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}
