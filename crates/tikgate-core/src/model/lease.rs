// ── DHCP lease ──

use serde::Serialize;

/// Lease state as reported by `/ip/dhcp-server/lease`. Only `bound`
/// matters to the gateway; everything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    Bound,
    Other(String),
}

impl LeaseStatus {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("bound") {
            Self::Bound
        } else {
            Self::Other(raw.to_owned())
        }
    }
}

/// One DHCP lease. Blank attributes are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lease {
    pub address: Option<String>,
    pub mac_address: Option<String>,
    pub host_name: Option<String>,
    pub comment: Option<String>,
    pub status: LeaseStatus,
}

impl Lease {
    pub fn is_bound(&self) -> bool {
        self.status == LeaseStatus::Bound
    }

    /// Operator-assigned name: the comment, else the client-reported hostname.
    pub fn label(&self) -> Option<&str> {
        self.comment.as_deref().or(self.host_name.as_deref())
    }
}
