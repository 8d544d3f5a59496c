// ── Reply keyboards ──
//
// Which button set accompanies a reply. Transports render the rows; the
// labels are also accepted as command aliases by the router.

use serde::Serialize;
use strum::Display;

type Rows = &'static [&'static [&'static str]];

const DEFAULT_ROWS: Rows = &[
    &["📊 Speed", "📱 Devices"],
    &["⚙️ Status", "🔥 Top5"],
    &["🗂️ Backup", "📝 Logs"],
    &["📈 Traffic", "❓ Help"],
];

const ADMIN_ROWS: Rows = &[
    &["📊 Speed", "📱 Devices"],
    &["⚙️ Status", "🔥 Top5"],
    &["🗂️ Backup", "📝 Logs"],
    &["📈 Traffic", "🚫 Firewall"],
    &["🔒 Block IP", "✅ Unblock IP"],
    &["💻 Terminal", "❓ Help"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KeyboardLayout {
    Default,
    Admin,
}

impl KeyboardLayout {
    pub fn for_caller(is_admin: bool) -> Self {
        if is_admin { Self::Admin } else { Self::Default }
    }

    /// Button labels, row by row.
    pub fn rows(self) -> Rows {
        match self {
            Self::Default => DEFAULT_ROWS,
            Self::Admin => ADMIN_ROWS,
        }
    }

    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        self.rows().iter().flat_map(|row| row.iter().copied())
    }
}
