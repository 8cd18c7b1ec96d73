//! # Mailquill Settings
//!
//! Persistence for the flat [`Settings`](mailquill_protocols::Settings)
//! record. The core never writes settings; it reads them per message, and
//! missing fields resolve to defaults at read time (the record itself
//! guarantees that via serde defaults).

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{FileStore, MemoryStore, SettingsStore};
