//! Node storage types.

use std::collections::BTreeMap;

use serde::Serialize;

/// Opaque handle to a node in a [`Document`](crate::Document) arena.
///
/// Handles stay valid for the lifetime of the document; detached nodes keep
/// their id but report as disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Rendered-geometry snapshot for an element.
///
/// The agent never measures for real; documents are built with the layout
/// the host would have computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub visible: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            visible: true,
        }
    }
}

impl Layout {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            visible: true,
        }
    }

    pub fn hidden() -> Self {
        Self {
            width: 0,
            height: 0,
            visible: false,
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Element { tag: String },
    Text { content: String },
}

/// Arena slot.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub attrs: BTreeMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub layout: Layout,
    /// Field value for value-bearing elements (input, textarea).
    pub value: String,
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.into() },
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            layout: Layout::default(),
            value: String::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text {
                content: content.into(),
            },
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            layout: Layout::default(),
            value: String::new(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }
}
