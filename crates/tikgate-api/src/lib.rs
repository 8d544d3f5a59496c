// tikgate-api: Async Rust client for the MikroTik RouterOS API

pub mod auth;
pub mod client;
pub mod error;
pub mod proto;
pub mod record;
pub mod transport;

pub use client::{ApiClient, Resource};
pub use error::Error;
pub use proto::{Reply, Sentence, SentenceCodec};
pub use record::Record;
pub use transport::{DEFAULT_API_PORT, TransportConfig};
