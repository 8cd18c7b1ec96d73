//! Trait seams between the page agent and the background service.

use async_trait::async_trait;

use crate::message::{BridgeRequest, BridgeResponse};

/// Typed async request/response channel from the page agent to the
/// privileged background service.
///
/// `send` never fails at the transport level: remote failures come back as
/// responses with `success: false`.
#[async_trait]
pub trait Bridge: Send + Sync {
    async fn send(&self, request: BridgeRequest) -> BridgeResponse;
}

/// Delivery seam from the background service into a page context, used for
/// keyboard-command triggers.
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn deliver(&self, request: BridgeRequest);
}
