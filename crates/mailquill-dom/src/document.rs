//! The document arena and its operations.

use tracing::trace;

use crate::node::{Layout, Node, NodeId, NodeKind};
use crate::selection::{RangeSnapshot, Selection};

/// One batch of structural changes, as a mutation observer would report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Roots of newly inserted subtrees.
    pub added: Vec<NodeId>,
}

/// An entry in the native undo journal.
///
/// Only editing commands push entries; direct value writes bypass the
/// journal, which is exactly the distinction the insertion engine's
/// strategy order exists to preserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub node: NodeId,
    pub inserted: String,
}

/// An in-memory host document.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    selection: Option<Selection>,
    focused: Option<NodeId>,
    pending_mutations: Vec<MutationRecord>,
    events: Vec<(NodeId, String)>,
    undo_journal: Vec<UndoEntry>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a `body` root.
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        nodes.push(Node::element("body"));
        Self {
            nodes,
            root: NodeId(0),
            selection: None,
            focused: None,
            pending_mutations: Vec::new(),
            events: Vec::new(),
            undo_journal: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    // ---- construction -----------------------------------------------------

    /// Create a detached element. No mutation is recorded until it is
    /// attached somewhere.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.nodes.push(Node::element(tag));
        NodeId(self.nodes.len() - 1)
    }

    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.nodes.push(Node::text(content));
        NodeId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        self.record_added(child);
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(0, child);
        self.record_added(child);
    }

    /// Remove a node (and implicitly its subtree) from the document.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        if self.focused == Some(node) {
            self.focused = None;
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            let children = &mut self.node_mut(parent).children;
            children.retain(|c| *c != node);
        }
        self.node_mut(node).parent = None;
    }

    fn record_added(&mut self, node: NodeId) {
        if self.is_connected(node) {
            self.pending_mutations.push(MutationRecord { added: vec![node] });
        }
    }

    // ---- structure --------------------------------------------------------

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Ancestors from the immediate parent up to (and including) the root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.node(node).parent;
        while let Some(id) = current {
            out.push(id);
            current = self.node(id).parent;
        }
        out
    }

    /// Preorder walk of the subtree below `node` (excluding `node` itself).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(node).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            for child in self.node(id).children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// True when the node is still attached under the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.ancestors(node).last() == Some(&self.root)
    }

    pub fn find_all(
        &self,
        scope: NodeId,
        pred: impl Fn(&Document, NodeId) -> bool,
    ) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| pred(self, *id))
            .collect()
    }

    pub fn find_first(
        &self,
        scope: NodeId,
        pred: impl Fn(&Document, NodeId) -> bool,
    ) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| pred(self, *id))
    }

    // ---- node inspection --------------------------------------------------

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).tag()
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.node(node).kind
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.node(node).attrs.contains_key(name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.node_mut(node).attrs.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.node_mut(node).attrs.remove(name);
    }

    /// Whitespace-separated class list membership.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    pub fn layout(&self, node: NodeId) -> Layout {
        self.node(node).layout
    }

    pub fn set_layout(&mut self, node: NodeId, layout: Layout) {
        self.node_mut(node).layout = layout;
    }

    /// Visible on screen with non-zero geometry.
    pub fn is_visible(&self, node: NodeId) -> bool {
        let layout = self.node(node).layout;
        layout.visible && layout.width > 0 && layout.height > 0
    }

    /// Concatenated text of the node and its subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let NodeKind::Text { content } = &self.node(node).kind {
            out.push_str(content);
        }
        for id in self.descendants(node) {
            if let NodeKind::Text { content } = &self.node(id).kind {
                out.push_str(content);
            }
        }
        out
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Text { content } => Some(content),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn set_text(&mut self, node: NodeId, content: impl Into<String>) {
        if let NodeKind::Text { content: old } = &mut self.node_mut(node).kind {
            *old = content.into();
        }
    }

    // ---- editability ------------------------------------------------------

    /// A rich-editable element (`contenteditable="true"`).
    pub fn is_rich_editable(&self, node: NodeId) -> bool {
        self.attr(node, "contenteditable") == Some("true")
    }

    /// A value-bearing form field.
    pub fn is_value_field(&self, node: NodeId) -> bool {
        matches!(self.tag(node), Some("textarea") | Some("input"))
    }

    pub fn is_editable(&self, node: NodeId) -> bool {
        self.is_rich_editable(node) || self.is_value_field(node)
    }

    pub fn value(&self, node: NodeId) -> &str {
        &self.node(node).value
    }

    /// Direct value assignment. Bypasses the undo journal, like setting
    /// `element.value` from script does.
    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        self.node_mut(node).value = value.into();
    }

    // ---- focus and selection ----------------------------------------------

    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_connected(node) {
            return false;
        }
        self.focused = Some(node);
        true
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The currently selected text, if the selection is non-empty.
    pub fn selected_text(&self) -> Option<String> {
        match self.selection.as_ref()? {
            Selection::Caret { .. } => None,
            Selection::Range { node, start, end } => {
                let text = slice_chars(self.value(*node), *start, *end);
                (!text.is_empty()).then_some(text)
            }
            Selection::Rich(range) => {
                let text = self.rich_range_text(range);
                (!text.is_empty()).then_some(text)
            }
        }
    }

    fn rich_range_text(&self, range: &RangeSnapshot) -> String {
        if range.start_node == range.end_node {
            let content = self.text(range.start_node).unwrap_or("");
            return slice_chars(content, range.start_offset, range.end_offset);
        }
        // Spanning range: suffix of the start node, whole nodes in between
        // (document order), prefix of the end node.
        let mut out = String::new();
        let start_text = self.text(range.start_node).unwrap_or("");
        out.push_str(&slice_chars(
            start_text,
            range.start_offset,
            char_len(start_text),
        ));
        let mut in_between = false;
        for id in self.descendants(self.root) {
            if id == range.start_node {
                in_between = true;
                continue;
            }
            if id == range.end_node {
                break;
            }
            if in_between {
                if let Some(text) = self.text(id) {
                    out.push_str(text);
                }
            }
        }
        let end_text = self.text(range.end_node).unwrap_or("");
        out.push_str(&slice_chars(end_text, 0, range.end_offset));
        out
    }

    // ---- editing commands -------------------------------------------------

    /// The in-place text-insertion command.
    ///
    /// Succeeds only when focus sits on a connected rich-editable element;
    /// splices at the current rich selection (or appends at the end when
    /// there is none), pushes an undo-journal entry, and leaves the caret at
    /// the end of the inserted text. Reports `false` instead of guessing in
    /// every other situation.
    pub fn exec_insert_text(&mut self, text: &str) -> bool {
        let Some(target) = self.focused else {
            return false;
        };
        if !self.is_connected(target) || !self.is_rich_editable(target) {
            return false;
        }

        let caret = match self.selection.clone() {
            Some(Selection::Rich(range)) if self.range_within(&range, target) => {
                self.replace_rich_range(&range, text)
            }
            _ => {
                // No usable selection inside the target: append at the end.
                let text_node = self.last_text_descendant(target).unwrap_or_else(|| {
                    let id = self.create_text("");
                    self.append_child(target, id);
                    id
                });
                let existing = self.text(text_node).unwrap_or("").to_string();
                let end = char_len(&existing);
                self.set_text(text_node, format!("{existing}{text}"));
                (text_node, end + char_len(text))
            }
        };

        self.undo_journal.push(UndoEntry {
            node: target,
            inserted: text.to_string(),
        });
        self.selection = Some(Selection::Caret {
            node: caret.0,
            offset: caret.1,
        });
        trace!(node = target.index(), "insertText command applied");
        true
    }

    fn range_within(&self, range: &RangeSnapshot, scope: NodeId) -> bool {
        let within = |node: NodeId| {
            node == scope || self.ancestors(node).contains(&scope)
        };
        self.is_connected(range.start_node)
            && within(range.start_node)
            && within(range.end_node)
    }

    /// Replace a rich range with `text`, returning the caret position at the
    /// end of the inserted text.
    fn replace_rich_range(&mut self, range: &RangeSnapshot, text: &str) -> (NodeId, usize) {
        if range.start_node == range.end_node {
            let content = self.text(range.start_node).unwrap_or("").to_string();
            let spliced = splice_chars(&content, range.start_offset, range.end_offset, text);
            self.set_text(range.start_node, spliced);
            return (range.start_node, range.start_offset + char_len(text));
        }
        let start_text = self.text(range.start_node).unwrap_or("").to_string();
        let end_text = self.text(range.end_node).unwrap_or("").to_string();
        let prefix = slice_chars(&start_text, 0, range.start_offset);
        self.set_text(range.start_node, format!("{prefix}{text}"));
        let mut in_between = false;
        let middles: Vec<NodeId> = self
            .descendants(self.root)
            .into_iter()
            .filter(|id| {
                if *id == range.start_node {
                    in_between = true;
                    return false;
                }
                if *id == range.end_node {
                    in_between = false;
                    return false;
                }
                in_between && self.text(*id).is_some()
            })
            .collect();
        for id in middles {
            self.set_text(id, "");
        }
        let suffix = slice_chars(&end_text, range.end_offset, char_len(&end_text));
        self.set_text(range.end_node, suffix);
        (range.start_node, range.start_offset + char_len(text))
    }

    fn last_text_descendant(&self, node: NodeId) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .rev()
            .find(|id| self.text(*id).is_some())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_journal.len()
    }

    pub fn undo_journal(&self) -> &[UndoEntry] {
        &self.undo_journal
    }

    // ---- events and mutations ---------------------------------------------

    /// Synthesize an event on a node. The host page's listeners are modeled
    /// as an observable log.
    pub fn dispatch(&mut self, node: NodeId, event: impl Into<String>) {
        self.events.push((node, event.into()));
    }

    pub fn events(&self) -> &[(NodeId, String)] {
        &self.events
    }

    pub fn events_for(&self, node: NodeId) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(id, _)| *id == node)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Drain pending structural mutation records.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending_mutations)
    }
}

/// Char-offset slice that never panics on out-of-range offsets.
pub(crate) fn slice_chars(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Replace the char range `start..end` of `s` with `insert`.
pub(crate) fn splice_chars(s: &str, start: usize, end: usize, insert: &str) -> String {
    let prefix: String = s.chars().take(start).collect();
    let suffix: String = s.chars().skip(end.max(start)).collect();
    format!("{prefix}{insert}{suffix}")
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
