// ── Typed device model ──
//
// Typed views of the records the gateway reads from the router. Raw
// `Record`s are converted exactly once (see `crate::convert`); nothing
// past that boundary looks up attributes by name or applies defaults.

pub mod firewall;
pub mod lease;
pub mod queue;
pub mod system;

// ── Re-exports ──────────────────────────────────────────────────────

pub use firewall::{AddressListEntry, EntryId, FilterRule};
pub use lease::{Lease, LeaseStatus};
pub use queue::{CounterPair, Queue};
pub use system::{Interface, LogEntry, SystemResource};
