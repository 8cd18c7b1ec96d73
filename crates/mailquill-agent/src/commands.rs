//! Trigger classification.
//!
//! Keyboard commands are bound in the background and relayed to the page,
//! so the page side only needs to recognize the two trigger messages.

use mailquill_protocols::BridgeRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GenerateReply,
    ImproveSelection,
}

impl Command {
    pub fn from_request(request: &BridgeRequest) -> Option<Self> {
        match request {
            BridgeRequest::TriggerGenerate => Some(Command::GenerateReply),
            BridgeRequest::TriggerImprove => Some(Command::ImproveSelection),
            _ => None,
        }
    }
}
