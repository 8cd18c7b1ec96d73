//! Selection model.
//!
//! Two shapes, mirroring what the host exposes: offset pairs for simple
//! form fields, and a cloned range for rich-editable trees. A cloned range
//! stays meaningful after focus moves elsewhere, which is why flows capture
//! it before opening any UI.

use serde::Serialize;

use crate::node::NodeId;

/// A cloned rich-content range. Offsets are char offsets into text nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSnapshot {
    pub start_node: NodeId,
    pub start_offset: usize,
    pub end_node: NodeId,
    pub end_offset: usize,
}

impl RangeSnapshot {
    pub fn within_node(node: NodeId, start: usize, end: usize) -> Self {
        Self {
            start_node: node,
            start_offset: start,
            end_node: node,
            end_offset: end,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_node == self.end_node && self.start_offset == self.end_offset
    }
}

/// The document-level selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Selection {
    /// Collapsed caret in a text node.
    Caret { node: NodeId, offset: usize },
    /// Offset range inside a value-bearing field.
    Range {
        node: NodeId,
        start: usize,
        end: usize,
    },
    /// Range inside rich content.
    Rich(RangeSnapshot),
}

impl Selection {
    /// The node the selection lives in (start side for rich ranges).
    pub fn anchor_node(&self) -> NodeId {
        match self {
            Selection::Caret { node, .. } => *node,
            Selection::Range { node, .. } => *node,
            Selection::Rich(range) => range.start_node,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        match self {
            Selection::Caret { .. } => true,
            Selection::Range { start, end, .. } => start == end,
            Selection::Rich(range) => range.is_collapsed(),
        }
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
