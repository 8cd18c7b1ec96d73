//! The talking-points dialog.
//!
//! A small state machine with three phases. Closed and Open transitions
//! come from user input; Submitting brackets the bridge round trip and
//! refuses dismissal until the outcome is known, so a slow response can
//! never race a second submission from the same dialog.

use tracing::debug;

use mailquill_dom::{decode_entities, Document, NodeId};

use crate::error::ModalError;

/// Tag of the dialog's isolated root element. The host page's styling and
/// scripts key off known tags, so ours uses one the page will never match.
pub const MODAL_TAG: &str = "mailquill-modal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Open,
    Submitting,
}

/// A key event routed to the dialog while it is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    Escape,
    Tab { shift: bool },
    Enter { ctrl: bool },
}

/// What a routed key event amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    Ignored,
    Closed,
    /// The user asked to generate; payload is the trimmed talking points.
    Submit(String),
}

/// Which of the dialog's own controls a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    Generate,
    Cancel,
}

struct OpenModal {
    root: NodeId,
    backdrop: NodeId,
    content: NodeId,
    input: NodeId,
    primary: NodeId,
    cancel: NodeId,
    error_line: NodeId,
    /// Focus to hand back when the dialog goes away.
    restore_focus: Option<NodeId>,
}

impl OpenModal {
    /// Tab order, wrapping at both ends.
    fn focusables(&self) -> [NodeId; 3] {
        [self.input, self.primary, self.cancel]
    }
}

/// Owner of the dialog's DOM and state.
pub struct ModalController {
    phase: ModalPhase,
    open: Option<OpenModal>,
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalController {
    pub fn new() -> Self {
        Self {
            phase: ModalPhase::Closed,
            open: None,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    /// Build and show the dialog. `prefill` is host-page text, so it gets
    /// entity-decoded and trimmed before it lands in the input.
    pub fn open(&mut self, doc: &mut Document, prefill: Option<&str>) -> Result<(), ModalError> {
        if self.phase != ModalPhase::Closed {
            return Err(ModalError::AlreadyOpen);
        }

        let restore_focus = doc.focused();
        let root_host = doc.root();

        let root = doc.create_element(MODAL_TAG);
        doc.set_attr(root, "data-isolated", "true");

        let backdrop = doc.create_element("div");
        doc.set_attr(backdrop, "class", "mailquill-backdrop");
        doc.append_child(root, backdrop);

        let content = doc.create_element("div");
        doc.set_attr(content, "class", "mailquill-modal-content");
        doc.set_attr(content, "role", "dialog");
        doc.set_attr(content, "aria-label", "Draft with AI");
        doc.append_child(backdrop, content);

        let input = doc.create_element("textarea");
        doc.set_attr(input, "class", "mailquill-points-input");
        doc.set_attr(input, "placeholder", "Talking points for the reply");
        doc.append_child(content, input);
        if let Some(prefill) = prefill {
            let cleaned = decode_entities(prefill);
            doc.set_value(input, cleaned.trim());
        }

        let error_line = doc.create_element("div");
        doc.set_attr(error_line, "class", "mailquill-modal-error");
        doc.set_attr(error_line, "role", "alert");
        doc.append_child(content, error_line);

        let primary = doc.create_element("button");
        doc.set_attr(primary, "class", "mailquill-modal-generate");
        let primary_label = doc.create_text("Generate");
        doc.append_child(primary, primary_label);
        doc.append_child(content, primary);

        let cancel = doc.create_element("button");
        doc.set_attr(cancel, "class", "mailquill-modal-cancel");
        let cancel_label = doc.create_text("Cancel");
        doc.append_child(cancel, cancel_label);
        doc.append_child(content, cancel);

        doc.append_child(root_host, root);
        doc.focus(input);

        self.open = Some(OpenModal {
            root,
            backdrop,
            content,
            input,
            primary,
            cancel,
            error_line,
            restore_focus,
        });
        self.phase = ModalPhase::Open;
        debug!("talking-points dialog opened");
        Ok(())
    }

    /// Route a key event. Keys reach the dialog only while it is up.
    pub fn handle_key(&mut self, doc: &mut Document, key: ModalKey) -> ModalOutcome {
        if self.phase == ModalPhase::Closed {
            return ModalOutcome::Ignored;
        }
        match key {
            ModalKey::Escape => match self.close(doc) {
                Ok(()) => ModalOutcome::Closed,
                Err(_) => ModalOutcome::Ignored,
            },
            ModalKey::Tab { shift } => {
                self.cycle_focus(doc, shift);
                ModalOutcome::Ignored
            }
            ModalKey::Enter { ctrl } => {
                if !ctrl || self.phase != ModalPhase::Open {
                    return ModalOutcome::Ignored;
                }
                match self.begin_submit(doc) {
                    Ok(points) => ModalOutcome::Submit(points),
                    Err(_) => ModalOutcome::Ignored,
                }
            }
        }
    }

    /// Map a click onto the dialog's action buttons. Labels are text nodes
    /// inside the buttons, so the walk covers ancestors too.
    pub fn classify_click(&self, doc: &Document, node: NodeId) -> Option<ModalClick> {
        let open = self.open.as_ref()?;
        let within = |target: NodeId| node == target || doc.ancestors(node).contains(&target);
        if within(open.primary) {
            Some(ModalClick::Generate)
        } else if within(open.cancel) {
            Some(ModalClick::Cancel)
        } else {
            None
        }
    }

    /// A click landing on `node`. Closes the dialog only for clicks on the
    /// backdrop itself, outside the content box, and only while idle.
    pub fn backdrop_click(&mut self, doc: &mut Document, node: NodeId) -> bool {
        let Some(open) = self.open.as_ref() else {
            return false;
        };
        if self.phase != ModalPhase::Open {
            return false;
        }
        let inside_content =
            node == open.content || doc.ancestors(node).contains(&open.content);
        if node != open.backdrop || inside_content {
            return false;
        }
        self.close(doc).is_ok()
    }

    /// Move into Submitting and hand back the trimmed talking points.
    pub fn begin_submit(&mut self, doc: &mut Document) -> Result<String, ModalError> {
        if self.phase != ModalPhase::Open {
            return Err(ModalError::NotOpen);
        }
        let open = self.open.as_ref().ok_or(ModalError::NotOpen)?;
        let points = doc.value(open.input).trim().to_string();
        doc.set_attr(open.primary, "disabled", "true");
        doc.set_attr(open.cancel, "disabled", "true");
        doc.set_text(open.error_line, "");
        self.phase = ModalPhase::Submitting;
        debug!("talking-points dialog submitting");
        Ok(points)
    }

    /// The round trip failed: show the message inline and reopen for edits.
    pub fn fail_submit(&mut self, doc: &mut Document, message: &str) -> Result<(), ModalError> {
        if self.phase != ModalPhase::Submitting {
            return Err(ModalError::NotOpen);
        }
        let open = self.open.as_ref().ok_or(ModalError::NotOpen)?;
        doc.remove_attr(open.primary, "disabled");
        doc.remove_attr(open.cancel, "disabled");
        doc.set_text(open.error_line, message);
        doc.focus(open.input);
        self.phase = ModalPhase::Open;
        Ok(())
    }

    /// The round trip succeeded: tear the dialog down.
    pub fn finish(&mut self, doc: &mut Document) -> Result<(), ModalError> {
        if self.phase != ModalPhase::Submitting {
            return Err(ModalError::NotOpen);
        }
        self.teardown(doc);
        Ok(())
    }

    /// Dismiss an idle dialog. Refused mid-submission.
    pub fn close(&mut self, doc: &mut Document) -> Result<(), ModalError> {
        match self.phase {
            ModalPhase::Closed => Err(ModalError::NotOpen),
            ModalPhase::Submitting => Err(ModalError::Busy),
            ModalPhase::Open => {
                self.teardown(doc);
                Ok(())
            }
        }
    }

    /// Unconditional teardown, for navigation. A pending submission's
    /// response will find the dialog gone and be dropped.
    pub fn abandon(&mut self, doc: &mut Document) {
        if self.phase != ModalPhase::Closed {
            self.teardown(doc);
        }
    }

    /// Current input contents, for tests and prefill checks.
    pub fn input_value<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        self.open.as_ref().map(|open| doc.value(open.input))
    }

    pub fn error_text(&self, doc: &Document) -> Option<String> {
        self.open
            .as_ref()
            .map(|open| doc.text_content(open.error_line))
    }

    fn cycle_focus(&self, doc: &mut Document, backwards: bool) {
        let Some(open) = self.open.as_ref() else {
            return;
        };
        let order = open.focusables();
        let current = doc
            .focused()
            .and_then(|node| order.iter().position(|id| *id == node))
            .unwrap_or(0);
        let next = if backwards {
            (current + order.len() - 1) % order.len()
        } else {
            (current + 1) % order.len()
        };
        doc.focus(order[next]);
    }

    fn teardown(&mut self, doc: &mut Document) {
        if let Some(open) = self.open.take() {
            doc.remove(open.root);
            if let Some(previous) = open.restore_focus {
                doc.focus(previous);
            }
        }
        self.phase = ModalPhase::Closed;
        debug!("talking-points dialog closed");
    }
}

#[cfg(test)]
#[path = "modal_tests.rs"]
mod tests;
