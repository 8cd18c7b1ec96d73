//! Mutation batching.
//!
//! The host page mutates constantly. The watcher buffers observed batches
//! in a bounded queue (oldest dropped under pressure) and answers one
//! question per drain: did anything land that could hold a compose region?
//! Missing a rescan is recoverable, because discovery also runs on a slow
//! periodic tick.

use std::collections::VecDeque;

use tracing::{trace, warn};

use mailquill_dom::{Document, MutationRecord, NodeId};

use crate::injector::ACTIONS_CLASS;
use crate::modal::MODAL_TAG;

const DEFAULT_CAPACITY: usize = 64;

pub struct MutationWatcher {
    queue: VecDeque<MutationRecord>,
    capacity: usize,
    dropped: u64,
}

impl Default for MutationWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationWatcher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Pull pending mutation records off the document into the queue.
    pub fn observe(&mut self, doc: &mut Document) {
        for record in doc.take_mutations() {
            if self.queue.len() == self.capacity {
                self.queue.pop_front();
                self.dropped += 1;
                warn!(dropped = self.dropped, "mutation queue full, dropping oldest batch");
            }
            self.queue.push_back(record);
        }
    }

    /// Drain every buffered batch and report whether a compose rescan is
    /// warranted. The whole queue is consumed even after the first hit so
    /// one drain never reports the same batch twice.
    pub fn needs_rescan(&mut self, doc: &Document) -> bool {
        let mut relevant = false;
        while let Some(record) = self.queue.pop_front() {
            if !relevant && record_is_relevant(doc, &record) {
                trace!("mutation batch warrants compose rescan");
                relevant = true;
            }
        }
        relevant
    }

    /// Batches dropped under queue pressure so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// A batch matters when an added subtree could hold a compose surface and
/// the subtree is not something this extension inserted itself.
fn record_is_relevant(doc: &Document, record: &MutationRecord) -> bool {
    record.added.iter().any(|root| {
        doc.is_connected(*root) && !is_own_ui(doc, *root) && subtree_holds_candidate(doc, *root)
    })
}

fn is_own_ui(doc: &Document, node: NodeId) -> bool {
    doc.has_class(node, ACTIONS_CLASS)
        || doc.tag(node) == Some(MODAL_TAG)
        || doc.has_class(node, crate::banner::BANNER_HOST_CLASS)
}

fn subtree_holds_candidate(doc: &Document, root: NodeId) -> bool {
    let holds = |d: &Document, id: NodeId| {
        d.is_editable(id) || d.attr(id, "role") == Some("dialog") || d.tag(id) == Some("form")
    };
    holds(doc, root) || doc.find_first(root, holds).is_some()
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
