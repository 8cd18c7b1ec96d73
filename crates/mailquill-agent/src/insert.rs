//! Text delivery.
//!
//! Strategies run in order from most faithful to least: the native editing
//! command (keeps the undo journal intact), then a direct value/DOM write,
//! then the clipboard. Every path that touches the page also dispatches an
//! `input` event so the host's own draft autosave notices the change.

use tracing::{debug, warn};

use mailquill_dom::{Document, NodeId, Selection};

use crate::capture::{CaptureSite, SelectionCapture};
use crate::clipboard::Clipboard;
use crate::region::RegionHandle;

/// How a piece of text ultimately landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Via the editing command; the user can undo it natively.
    Inserted,
    /// Via a direct value or DOM write; content is correct, undo is not.
    ValueSet,
    /// Nothing writable was reachable; the text sits on the clipboard.
    Clipboard,
}

/// Append generated text at the end of a compose region.
///
/// A single space joins the new text onto existing content, and only when
/// the existing content does not already end in whitespace.
pub fn append_to_region(
    doc: &mut Document,
    region: &RegionHandle,
    text: &str,
    clipboard: &mut Clipboard,
) -> Applied {
    let existing = if doc.is_value_field(region.node) {
        doc.value(region.node).to_string()
    } else {
        doc.text_content(region.node)
    };
    let payload = if existing.is_empty() || existing.ends_with(char::is_whitespace) {
        text.to_string()
    } else {
        format!(" {text}")
    };

    if doc.is_connected(region.node) && doc.is_rich_editable(region.node) {
        doc.focus(region.node);
        // Appending, not replacing: whatever was selected stays out of it.
        doc.clear_selection();
        if doc.exec_insert_text(&payload) {
            doc.dispatch(region.node, "input");
            return Applied::Inserted;
        }
    }

    if doc.is_connected(region.node) && doc.is_value_field(region.node) {
        let value = doc.value(region.node).to_string();
        let updated = format!("{value}{payload}");
        let caret = updated.chars().count();
        doc.set_value(region.node, updated);
        doc.set_selection(Selection::Range {
            node: region.node,
            start: caret,
            end: caret,
        });
        doc.dispatch(region.node, "input");
        debug!(node = region.node.index(), "appended via direct value write");
        return Applied::ValueSet;
    }

    if doc.is_connected(region.node) {
        let caret = payload.chars().count();
        let chunk = doc.create_text(payload);
        doc.append_child(region.node, chunk);
        doc.set_selection(Selection::Caret {
            node: chunk,
            offset: caret,
        });
        doc.dispatch(region.node, "input");
        debug!(node = region.node.index(), "appended via direct DOM write");
        return Applied::ValueSet;
    }

    warn!("compose region unreachable, falling back to clipboard");
    clipboard.write(text);
    Applied::Clipboard
}

/// Replace a previously captured selection with improved text.
pub fn replace_capture(
    doc: &mut Document,
    capture: &SelectionCapture,
    text: &str,
    clipboard: &mut Clipboard,
) -> Applied {
    if !capture.is_alive(doc) {
        warn!("captured selection site is gone, falling back to clipboard");
        clipboard.write(text);
        return Applied::Clipboard;
    }
    match &capture.site {
        CaptureSite::Field { node, start, end } => {
            replace_field_range(doc, *node, *start, *end, text)
        }
        CaptureSite::Rich { editor, range } => {
            doc.focus(*editor);
            doc.set_selection(Selection::Rich(range.clone()));
            if doc.exec_insert_text(text) {
                doc.dispatch(*editor, "input");
                Applied::Inserted
            } else {
                warn!("editing command refused rich replacement, falling back to clipboard");
                clipboard.write(text);
                Applied::Clipboard
            }
        }
    }
}

fn replace_field_range(
    doc: &mut Document,
    node: NodeId,
    start: usize,
    end: usize,
    text: &str,
) -> Applied {
    let value = doc.value(node).to_string();
    let spliced = splice_chars(&value, start, end, text);
    doc.set_value(node, spliced);
    let caret = start + text.chars().count();
    doc.set_selection(Selection::Range {
        node,
        start: caret,
        end: caret,
    });
    doc.dispatch(node, "input");
    debug!(node = node.index(), "replaced field range via value write");
    Applied::ValueSet
}

/// Char-offset splice, safe on multibyte content.
fn splice_chars(value: &str, start: usize, end: usize, replacement: &str) -> String {
    let take = |range: std::ops::Range<usize>| -> String {
        value
            .chars()
            .skip(range.start)
            .take(range.end.saturating_sub(range.start))
            .collect()
    };
    let len = value.chars().count();
    let start = start.min(len);
    let end = end.clamp(start, len);
    format!("{}{}{}", take(0..start), replacement, take(end..len))
}

#[cfg(test)]
#[path = "insert_tests.rs"]
mod tests;
