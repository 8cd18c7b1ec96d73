//! # Mailquill Background
//!
//! The privileged side of the bridge. Holds the API credential, resolves
//! settings per message (no in-memory state survives between messages),
//! builds prompts, performs the completion call, and owns the
//! browser-action icon state.

pub mod api;
pub mod client;
pub mod commands;
pub mod handler;
pub mod icon;
pub mod prompt;

pub use client::{CompletionClient, CompletionSpec, DEFAULT_API_URL};
pub use commands::{CommandDispatcher, CMD_GENERATE, CMD_IMPROVE};
pub use handler::BackgroundService;
pub use icon::{IconController, IconSink};
