//! Shared synthetic pages for agent tests.

use mailquill_dom::{Document, Layout, NodeId};

/// A realistic mail tab: an open thread with two messages and a popup
/// compose dialog whose body carries the well-known accessible label.
pub(crate) struct MailPage {
    pub doc: Document,
    pub dialog: NodeId,
    pub editor: NodeId,
    pub send: NodeId,
    pub send_row: NodeId,
}

pub(crate) fn mail_page() -> MailPage {
    let mut doc = Document::new();
    let root = doc.root();

    let thread = doc.create_element("div");
    doc.set_attr(thread, "role", "main");
    doc.append_child(root, thread);
    for body in ["Hi team, quick question about the rollout.", "Replying with details inline."] {
        let article = doc.create_element("div");
        doc.set_attr(article, "role", "article");
        let text = doc.create_text(body);
        doc.append_child(article, text);
        doc.append_child(thread, article);
    }

    let dialog = doc.create_element("div");
    doc.set_attr(dialog, "role", "dialog");
    doc.set_layout(dialog, Layout::sized(600, 500));
    doc.append_child(root, dialog);

    let editor = doc.create_element("div");
    doc.set_attr(editor, "role", "textbox");
    doc.set_attr(editor, "contenteditable", "true");
    doc.set_attr(editor, "aria-label", "Message Body");
    doc.set_layout(editor, Layout::sized(560, 300));
    doc.append_child(dialog, editor);

    let send_row = doc.create_element("tr");
    doc.append_child(dialog, send_row);
    let send = doc.create_element("div");
    doc.set_attr(send, "role", "button");
    doc.set_attr(send, "data-tooltip", "Send (Ctrl-Enter)");
    let label = doc.create_text("Send");
    doc.append_child(send, label);
    doc.append_child(send_row, send);

    // The watcher consumes mutations from here on; page construction is
    // not part of any test's observed stream.
    doc.take_mutations();

    MailPage {
        doc,
        dialog,
        editor,
        send,
        send_row,
    }
}

/// A page with no compose surface at all.
pub(crate) fn thread_only_page() -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    let article = doc.create_element("div");
    doc.set_attr(article, "role", "article");
    let text = doc.create_text("Just reading mail.");
    doc.append_child(article, text);
    doc.append_child(root, article);
    doc.take_mutations();
    doc
}
