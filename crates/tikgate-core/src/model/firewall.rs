// ── Firewall types ──

use std::fmt;

use serde::Serialize;

/// Device-assigned record handle (`.id`, e.g. `*1A`).
///
/// There is no public constructor: the only way to get one is to read it
/// from the device, so a removal always targets an entry that was looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub(crate) fn from_device(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Member of a named `/ip/firewall/address-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressListEntry {
    pub id: EntryId,
    pub list: String,
    pub address: String,
    pub comment: Option<String>,
}

/// One `/ip/firewall/filter` rule, reduced to what the summary shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterRule {
    pub chain: Option<String>,
    pub action: Option<String>,
    pub protocol: Option<String>,
    pub comment: Option<String>,
    pub disabled: bool,
}
