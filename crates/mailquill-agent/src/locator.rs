//! Compose-region discovery.
//!
//! The mail surface's markup drifts, so discovery runs as tiers of
//! progressively broader queries, and every candidate from any tier must
//! still pass one conservative acceptance filter. An empty result is a
//! normal, frequent condition, never an error.

use tracing::debug;

use mailquill_dom::{Document, NodeId};

use crate::region::RegionHandle;

/// The well-known accessible label on the compose body.
pub const COMPOSE_LABEL: &str = "Message Body";

/// Minimum rendered size for a region to count as a real compose body.
const MIN_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 50;

/// One query tier.
struct LocatorTier {
    name: &'static str,
    run: fn(&Document) -> Vec<NodeId>,
}

/// Tiers in priority order: most specific first, broad fallback second.
const TIERS: &[LocatorTier] = &[
    LocatorTier {
        name: "labeled-textbox",
        run: query_labeled_textbox,
    },
    LocatorTier {
        name: "broad-editable",
        run: query_broad_editable,
    },
];

/// Find all compose regions in document order.
pub fn locate_compose_regions(doc: &Document) -> Vec<RegionHandle> {
    for tier in TIERS {
        let candidates = (tier.run)(doc);
        if candidates.is_empty() {
            continue;
        }
        debug!(tier = tier.name, candidates = candidates.len(), "locator tier matched");
        let regions: Vec<RegionHandle> = candidates
            .into_iter()
            .filter_map(|node| accept(doc, node))
            .collect();
        debug!(tier = tier.name, accepted = regions.len(), "locator filter applied");
        return regions;
    }
    debug!("no compose region candidates");
    Vec::new()
}

/// Tier 1: the single most specific known selector.
fn query_labeled_textbox(doc: &Document) -> Vec<NodeId> {
    doc.find_all(doc.root(), |d, id| {
        d.attr(id, "role") == Some("textbox")
            && d.is_rich_editable(id)
            && d.attr(id, "aria-label")
                .is_some_and(|label| label.contains(COMPOSE_LABEL))
    })
}

/// Tier 2: anything editable at all.
fn query_broad_editable(doc: &Document) -> Vec<NodeId> {
    doc.find_all(doc.root(), |d, id| {
        d.is_rich_editable(id) || d.tag(id) == Some("textarea")
    })
}

/// The strict acceptance filter. Requires the exact structural pattern,
/// real on-screen geometry, and ancestry inside a known compose container.
fn accept(doc: &Document, node: NodeId) -> Option<RegionHandle> {
    if !matches_structural_pattern(doc, node) {
        return None;
    }
    let layout = doc.layout(node);
    if !doc.is_visible(node) || layout.width < MIN_WIDTH || layout.height < MIN_HEIGHT {
        return None;
    }
    let root = compose_root(doc, node)?;
    Some(RegionHandle {
        node,
        root,
        thread_context: conversation_context(doc),
        viewport: layout,
    })
}

/// Exact structural match to the specific compose pattern.
fn matches_structural_pattern(doc: &Document, node: NodeId) -> bool {
    doc.attr(node, "role") == Some("textbox")
        && doc.is_rich_editable(node)
        && doc
            .attr(node, "aria-label")
            .is_some_and(|label| label.contains(COMPOSE_LABEL))
}

/// Nearest ancestor shaped like a compose container.
fn compose_root(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.ancestors(node)
        .into_iter()
        .find(|id| matches_container_shape(doc, *id))
}

/// Known compose-container shapes: the popup compose dialog, an inline
/// reply form, or an explicitly-marked editor panel.
fn matches_container_shape(doc: &Document, node: NodeId) -> bool {
    doc.attr(node, "role") == Some("dialog")
        || doc.tag(node) == Some("form")
        || doc.has_class(node, "editor-panel")
}

/// Conversation context: the visible message bodies of the open thread.
pub fn conversation_context(doc: &Document) -> Option<String> {
    let articles = doc.find_all(doc.root(), |d, id| d.attr(id, "role") == Some("article"));
    let joined = articles
        .iter()
        .map(|id| doc.text_content(*id).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
