//! Global keyboard-command dispatch.
//!
//! The host delivers command identifiers to the background; this maps them
//! to trigger messages relayed into the page context, which resolves the
//! target region/selection itself.

use std::sync::Arc;

use tracing::{debug, warn};

use mailquill_protocols::{BridgeRequest, PageSink};

/// Command id for the generate-reply shortcut.
pub const CMD_GENERATE: &str = "generate-reply";
/// Command id for the improve-selection shortcut.
pub const CMD_IMPROVE: &str = "improve-selection";

pub struct CommandDispatcher {
    page: Arc<dyn PageSink>,
}

impl CommandDispatcher {
    pub fn new(page: Arc<dyn PageSink>) -> Self {
        Self { page }
    }

    pub async fn dispatch(&self, command: &str) {
        let request = match command {
            CMD_GENERATE => BridgeRequest::TriggerGenerate,
            CMD_IMPROVE => BridgeRequest::TriggerImprove,
            other => {
                warn!(command = other, "unknown command");
                return;
            }
        };
        debug!(command, "dispatching command to page");
        self.page.deliver(request).await;
    }
}
