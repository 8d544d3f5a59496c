//! Command gateway between chat-style callers and a MikroTik RouterOS device.
//!
//! Inbound text becomes a [`Reply`] through a fixed pipeline:
//!
//! - **Routing**: [`command::parse`] maps text onto a [`Command`] using a
//!   declarative, first-match-wins table. No I/O happens here.
//! - **Authorization**: [`AccessGate`] decides whether a caller may run
//!   privileged commands (backup, firewall, block/unblock, terminal).
//!   With an empty allow-list the outcome is whatever
//!   [`EmptyAdminPolicy`] the configuration pinned.
//! - **Session**: [`SessionManager`] owns the single device link, serializes
//!   access to it, and reconnects after failures. The link itself is
//!   abstracted behind [`Connector`] / [`DeviceLink`] so tests can run
//!   against in-memory devices.
//! - **Aggregation**: the [`aggregate`] functions turn raw records into the
//!   typed [`model`] once; [`report`] renders them.
//!
//! [`Gateway`] ties these together and guarantees one reply per command.

pub mod access;
pub mod aggregate;
pub mod command;
pub mod config;
pub mod convert;
pub mod device;
pub mod error;
pub mod format;
pub mod gateway;
pub mod keyboard;
pub mod model;
pub mod names;
pub mod ranking;
pub mod report;
pub mod session;
pub mod terminal;

// ── Primary re-exports ──────────────────────────────────────────────
pub use access::AccessGate;
pub use command::Command;
pub use config::{
    AccessConfig, EmptyAdminPolicy, FirewallConfig, GatewayConfig, RankSide, RouterConfig,
};
pub use device::{Connector, DeviceLink, RouterOsConnector};
pub use error::{CoreError, ValidationError};
pub use gateway::{Gateway, Reply};
pub use keyboard::KeyboardLayout;
pub use session::{Session, SessionManager};

// Transport types consumers need when implementing `DeviceLink`.
pub use tikgate_api::{Error as ApiError, Record};
