//! Action-control injection.
//!
//! Adds the draft trigger next to the compose window's send control. The
//! marker attribute on the compose root makes the whole operation
//! idempotent no matter how many times discovery re-reports the same
//! region.

use tracing::{debug, warn};

use mailquill_dom::{Document, NodeId};

use crate::region::RegionHandle;

/// Marker set on a compose root once its controls exist.
pub const MARKER_ATTR: &str = "data-mailquill-injected";

/// Class on the injected container, used for cleanup and click routing.
pub const ACTIONS_CLASS: &str = "mailquill-actions";

/// Class on the draft trigger button itself.
pub const TRIGGER_CLASS: &str = "mailquill-trigger";

/// Words that identify a send-like control, matched case-insensitively
/// against visible text, accessible label, and tooltip.
const AFFIRMATIVE_TERMS: &[&str] = &["send", "submit", "reply"];

/// Inject the action controls into `region` if it does not have them yet.
/// Returns `true` when the controls are present, whether this call added
/// them or a previous one did; `false` means injection declined.
pub fn inject(doc: &mut Document, region: &RegionHandle) -> bool {
    if doc.has_attr(region.root, MARKER_ATTR) {
        return true;
    }
    let Some(anchor) = anchor_point(doc, region.root) else {
        warn!(root = region.root.index(), "no injection anchor in compose root");
        return false;
    };

    let container = doc.create_element("div");
    doc.set_attr(container, "class", ACTIONS_CLASS);
    let button = doc.create_element("button");
    doc.set_attr(button, "class", TRIGGER_CLASS);
    doc.set_attr(button, "aria-label", "Draft a reply with AI");
    let label = doc.create_text("Draft");
    doc.append_child(button, label);
    doc.append_child(container, button);
    doc.prepend_child(anchor, container);

    doc.set_attr(region.root, MARKER_ATTR, "true");
    debug!(root = region.root.index(), "injected compose controls");
    true
}

/// The injected trigger button for a compose root, if present.
pub fn trigger_button(doc: &Document, root: NodeId) -> Option<NodeId> {
    doc.find_first(root, |d, id| d.has_class(id, TRIGGER_CLASS))
}

/// Whether `node` is (or sits inside) an injected trigger.
pub fn is_trigger(doc: &Document, node: NodeId) -> bool {
    doc.has_class(node, TRIGGER_CLASS)
        || doc
            .ancestors(node)
            .iter()
            .any(|id| doc.has_class(*id, TRIGGER_CLASS))
}

/// Remove every injected control and marker from the document. Used on
/// navigation, when the compose windows are about to be rebuilt.
pub fn cleanup_all(doc: &mut Document) {
    let containers = doc.find_all(doc.root(), |d, id| d.has_class(id, ACTIONS_CLASS));
    for container in &containers {
        doc.remove(*container);
    }
    let marked = doc.find_all(doc.root(), |d, id| d.has_attr(id, MARKER_ATTR));
    for root in &marked {
        doc.remove_attr(*root, MARKER_ATTR);
    }
    if !containers.is_empty() || !marked.is_empty() {
        debug!(
            containers = containers.len(),
            markers = marked.len(),
            "removed injected controls"
        );
    }
}

/// Preferred anchor: the parent of the send control, so the trigger lands
/// beside it. Falls back to a toolbar-shaped element in the same root.
fn anchor_point(doc: &Document, root: NodeId) -> Option<NodeId> {
    if let Some(send) = find_send_control(doc, root) {
        return doc.parent(send);
    }
    doc.find_first(root, |d, id| {
        d.attr(id, "role") == Some("toolbar") || d.has_class(id, "toolbar") || d.tag(id) == Some("footer")
    })
}

fn find_send_control(doc: &Document, root: NodeId) -> Option<NodeId> {
    doc.find_first(root, |d, id| {
        d.attr(id, "role") == Some("button") && is_affirmative(d, id)
    })
}

fn is_affirmative(doc: &Document, node: NodeId) -> bool {
    let mut haystack = doc.text_content(node);
    for attr in ["aria-label", "data-tooltip"] {
        if let Some(value) = doc.attr(node, attr) {
            haystack.push(' ');
            haystack.push_str(value);
        }
    }
    let haystack = haystack.to_lowercase();
    AFFIRMATIVE_TERMS.iter().any(|term| haystack.contains(term))
}

#[cfg(test)]
#[path = "injector_tests.rs"]
mod tests;
