//! Compose region handles.

use mailquill_dom::{Document, Layout, NodeId};

/// A discovered editable compose surface.
///
/// `root` is the enclosing compose container (dialog/form/panel); it is the
/// scope for the injection marker, so the same logical compose instance
/// reached through different node references still injects once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionHandle {
    /// The editable surface itself.
    pub node: NodeId,
    /// The compose root that owns it.
    pub root: NodeId,
    /// Conversation context captured at discovery time.
    pub thread_context: Option<String>,
    /// Size/visibility snapshot at discovery time.
    pub viewport: Layout,
}

impl RegionHandle {
    /// Still attached and still editable.
    pub fn is_alive(&self, doc: &Document) -> bool {
        doc.is_connected(self.node) && doc.is_editable(self.node)
    }

    /// Whether `node` falls inside this region's compose root.
    pub fn owns(&self, doc: &Document, node: NodeId) -> bool {
        node == self.root || doc.ancestors(node).contains(&self.root)
    }
}
