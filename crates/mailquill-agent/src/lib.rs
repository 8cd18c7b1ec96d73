//! # Mailquill Agent
//!
//! The in-page half of the system. Runs single-threaded and event-driven
//! against a [`Document`](mailquill_dom::Document): DOM events, mutation
//! batches, and bridge responses all interleave on one queue, so nothing
//! here takes a lock.
//!
//! The host page's markup is not a stable contract. Everything that touches
//! it is written as an ordered chain of strategies with a uniform
//! success/failure signal (locator tiers, insertion strategies, injection
//! anchors) so the system degrades gracefully instead of breaking when the
//! markup drifts.

pub mod agent;
pub mod banner;
pub mod capture;
pub mod clipboard;
pub mod commands;
pub mod error;
pub mod injector;
pub mod insert;
pub mod locator;
pub mod modal;
pub mod region;
pub mod watcher;

pub use agent::PageAgent;
pub use banner::{BannerHost, Severity};
pub use capture::{capture_selection, CaptureSite, SelectionCapture};
pub use clipboard::Clipboard;
pub use commands::Command;
pub use error::ModalError;
pub use insert::{append_to_region, replace_capture, Applied};
pub use locator::locate_compose_regions;
pub use modal::{ModalClick, ModalController, ModalKey, ModalOutcome, ModalPhase};
pub use region::RegionHandle;
pub use watcher::MutationWatcher;

#[cfg(test)]
pub(crate) mod fixtures;
