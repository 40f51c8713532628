//! Shared domain types, configuration, and error taxonomy for the stealth
//! wallet backend. Everything below this crate (`stealth-store`,
//! `stealth-node`, `stealth-coordinator`) builds on these types rather
//! than inventing their own.

pub mod config;
pub mod entities;
pub mod error;

pub use config::{AuthSecret, CoordinatorConfig, NodeConfig, SecretHex};
pub use entities::{validate_r_shape, AnnouncementEvent, InboxEntry, InboxStatus};
pub use error::ConfigError;
