use mailquill_dom::Document;

use crate::fixtures::mail_page;
use crate::injector::{cleanup_all, inject, is_trigger, trigger_button, MARKER_ATTR};
use crate::locator::locate_compose_regions;

#[test]
fn injects_next_to_send_control() {
    let mut page = mail_page();
    let region = locate_compose_regions(&page.doc).remove(0);

    assert!(inject(&mut page.doc, &region));

    let button = trigger_button(&page.doc, page.dialog).unwrap();
    // Landed in the send button's row, not somewhere arbitrary.
    assert!(page.doc.ancestors(button).contains(&page.send_row));
    assert!(page.doc.has_attr(page.dialog, MARKER_ATTR));
}

#[test]
fn second_injection_is_a_no_op() {
    let mut page = mail_page();
    let region = locate_compose_regions(&page.doc).remove(0);

    assert!(inject(&mut page.doc, &region));
    // Still reports the controls as present, but adds nothing.
    assert!(inject(&mut page.doc, &region));

    let buttons = page
        .doc
        .find_all(page.doc.root(), |d, id| is_trigger(d, id));
    assert_eq!(buttons.len(), 1);
}

#[test]
fn falls_back_to_toolbar_without_send_control() {
    let mut page = mail_page();
    page.doc.remove(page.send);
    let toolbar = page.doc.create_element("div");
    page.doc.set_attr(toolbar, "role", "toolbar");
    page.doc.append_child(page.dialog, toolbar);
    let region = locate_compose_regions(&page.doc).remove(0);

    assert!(inject(&mut page.doc, &region));
    let button = trigger_button(&page.doc, page.dialog).unwrap();
    assert!(page.doc.ancestors(button).contains(&toolbar));
}

#[test]
fn skips_region_without_any_anchor() {
    let mut page = mail_page();
    page.doc.remove(page.send_row);
    let region = locate_compose_regions(&page.doc).remove(0);

    assert!(!inject(&mut page.doc, &region));
    // No marker either, so a later mutation that adds a toolbar can retry.
    assert!(!page.doc.has_attr(page.dialog, MARKER_ATTR));
}

#[test]
fn tooltip_identifies_send_control() {
    let mut page = mail_page();
    // Strip the visible label; only the tooltip says "Send".
    let label = page.doc.children(page.send)[0];
    page.doc.remove(label);
    let region = locate_compose_regions(&page.doc).remove(0);

    assert!(inject(&mut page.doc, &region));
    assert!(trigger_button(&page.doc, page.dialog).is_some());
}

#[test]
fn trigger_click_routing_matches_descendants() {
    let mut page = mail_page();
    let region = locate_compose_regions(&page.doc).remove(0);
    inject(&mut page.doc, &region);

    let button = trigger_button(&page.doc, page.dialog).unwrap();
    let inner = page.doc.children(button)[0];
    assert!(is_trigger(&page.doc, button));
    assert!(is_trigger(&page.doc, inner));
    assert!(!is_trigger(&page.doc, page.send));
}

#[test]
fn cleanup_removes_controls_and_markers() {
    let mut page = mail_page();
    let region = locate_compose_regions(&page.doc).remove(0);
    inject(&mut page.doc, &region);

    cleanup_all(&mut page.doc);

    assert!(trigger_button(&page.doc, page.dialog).is_none());
    assert!(!page.doc.has_attr(page.dialog, MARKER_ATTR));
    // And the region can be injected again from scratch.
    assert!(inject(&mut page.doc, &region));
}

#[test]
fn cleanup_on_pristine_document_is_quiet() {
    let mut doc = Document::new();
    cleanup_all(&mut doc);
    assert!(doc.take_mutations().is_empty());
}
