//! # Mailquill Protocols
//!
//! Shared definitions for the Mailquill composition assistant.
//!
//! - Bridge message schema (page agent <-> privileged background service)
//! - Settings record with read-time defaults
//! - Common enums (source tag, reasoning effort, icon state)
//! - Error types shared across crates

pub mod bridge;
pub mod error;
pub mod message;
pub mod settings;
pub mod types;

pub use bridge::{Bridge, PageSink};
pub use error::{ApiError, BackgroundError};
pub use message::{BridgeRequest, BridgeResponse};
pub use settings::{Settings, SELECTED_TEXT_TOKEN, TALKING_POINTS_TOKEN, THREAD_CONTEXT_TOKEN};
pub use types::{IconState, ReasoningEffort, SourceTag};
