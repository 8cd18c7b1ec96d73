//! Browser-action icon state.
//!
//! Owned, passed-around state rather than an ambient global: the
//! controller is the only writer, and a generation counter makes the
//! transient `Inactive` revert lose races against newer transitions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use mailquill_protocols::IconState;

/// Where icon transitions land (the badge surface; a recording sink in
/// tests).
#[async_trait]
pub trait IconSink: Send + Sync {
    async fn apply(&self, state: IconState);
}

/// No-op sink for wiring without a badge surface.
pub struct NullIconSink;

#[async_trait]
impl IconSink for NullIconSink {
    async fn apply(&self, _state: IconState) {}
}

const DEFAULT_REVERT_DELAY: Duration = Duration::from_secs(2);

struct IconInner {
    state: RwLock<IconState>,
    generation: AtomicU64,
    sink: Arc<dyn IconSink>,
    revert_delay: Duration,
}

/// Process-wide icon state machine.
#[derive(Clone)]
pub struct IconController {
    inner: Arc<IconInner>,
}

impl IconController {
    pub fn new(sink: Arc<dyn IconSink>) -> Self {
        Self::with_revert_delay(sink, DEFAULT_REVERT_DELAY)
    }

    pub fn with_revert_delay(sink: Arc<dyn IconSink>, revert_delay: Duration) -> Self {
        Self {
            inner: Arc::new(IconInner {
                state: RwLock::new(IconState::Idle),
                generation: AtomicU64::new(0),
                sink,
                revert_delay,
            }),
        }
    }

    pub async fn state(&self) -> IconState {
        *self.inner.state.read().await
    }

    /// Transition to a new state, superseding any pending revert.
    pub async fn set(&self, state: IconState) {
        self.transition(state).await;
    }

    async fn transition(&self, state: IconState) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.state.write().await = state;
        debug!(?state, "icon transition");
        self.inner.sink.apply(state).await;
        generation
    }

    /// Show `Inactive`, reverting to `Idle` after the fixed delay unless a
    /// newer transition preempts the revert.
    pub async fn flash_inactive(&self) {
        let generation = self.transition(IconState::Inactive).await;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.revert_delay).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            inner.generation.fetch_add(1, Ordering::SeqCst);
            *inner.state.write().await = IconState::Idle;
            inner.sink.apply(IconState::Idle).await;
        });
    }
}

#[cfg(test)]
#[path = "icon_tests.rs"]
mod tests;
