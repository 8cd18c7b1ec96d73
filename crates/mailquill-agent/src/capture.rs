//! Selection capture.
//!
//! The improve flow replaces exactly what the user had highlighted, but
//! the live selection collapses the moment our own UI takes focus. So the
//! flow snapshots everything it needs up front and carries the snapshot
//! through the round trip.

use mailquill_dom::{Document, NodeId, RangeSnapshot, Selection};

/// Where a captured selection lives, in enough detail to replace it later
/// without consulting the live selection again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSite {
    /// Offset range inside a value-bearing field.
    Field { node: NodeId, start: usize, end: usize },
    /// Cloned range inside a rich editor.
    Rich { editor: NodeId, range: RangeSnapshot },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCapture {
    pub text: String,
    pub site: CaptureSite,
}

impl SelectionCapture {
    /// The element the capture anchors to, for region-membership checks.
    pub fn anchor(&self) -> NodeId {
        match &self.site {
            CaptureSite::Field { node, .. } => *node,
            CaptureSite::Rich { editor, .. } => *editor,
        }
    }

    /// Whether the captured site is still attached to the document.
    pub fn is_alive(&self, doc: &Document) -> bool {
        match &self.site {
            CaptureSite::Field { node, .. } => doc.is_connected(*node),
            CaptureSite::Rich { editor, range } => {
                doc.is_connected(*editor)
                    && doc.is_connected(range.start_node)
                    && doc.is_connected(range.end_node)
            }
        }
    }
}

/// Snapshot the current selection. `None` for no selection, a collapsed
/// caret, or a range over nothing but emptiness.
pub fn capture_selection(doc: &Document) -> Option<SelectionCapture> {
    let text = doc.selected_text()?;
    let site = match doc.selection()? {
        Selection::Caret { .. } => return None,
        Selection::Range { node, start, end } => CaptureSite::Field {
            node: *node,
            start: *start,
            end: *end,
        },
        Selection::Rich(range) => CaptureSite::Rich {
            editor: enclosing_editor(doc, range.start_node)?,
            range: range.clone(),
        },
    };
    Some(SelectionCapture { text, site })
}

/// The rich editor a text node sits in (the node itself if it is one).
fn enclosing_editor(doc: &Document, node: NodeId) -> Option<NodeId> {
    if doc.is_rich_editable(node) {
        return Some(node);
    }
    doc.ancestors(node)
        .into_iter()
        .find(|id| doc.is_rich_editable(*id))
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
