use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;

use mailquill_dom::{Layout, RangeSnapshot, Selection};
use mailquill_protocols::{Bridge, BridgeRequest, BridgeResponse, IconState, SourceTag};

use crate::agent::PageAgent;
use crate::fixtures::mail_page;
use crate::injector::{is_trigger, trigger_button};
use crate::modal::{ModalKey, ModalPhase};

/// Bridge test double: replies from a script, records everything it saw.
struct ScriptedBridge {
    responses: Mutex<VecDeque<BridgeResponse>>,
    seen: Mutex<Vec<BridgeRequest>>,
}

impl ScriptedBridge {
    fn new(responses: Vec<BridgeResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<BridgeRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bridge for ScriptedBridge {
    async fn send(&self, request: BridgeRequest) -> BridgeResponse {
        self.seen.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(BridgeResponse::ok)
    }
}

#[tokio::test]
async fn init_discovers_and_injects() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    assert_eq!(agent.regions().len(), 1);
    assert!(trigger_button(agent.doc(), page.dialog).is_some());
}

#[tokio::test]
async fn generate_flow_round_trips_and_inserts_draft() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_draft("Thanks, Friday works.")]);
    let mut agent = PageAgent::new(page.doc, bridge.clone());
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    assert_eq!(agent.modal().phase(), ModalPhase::Open);

    let input = agent.doc().focused().unwrap();
    agent.doc_mut().set_value(input, "thank them, confirm Friday");
    agent.press_key(ModalKey::Enter { ctrl: true }).await;

    assert_eq!(agent.modal().phase(), ModalPhase::Closed);
    assert_eq!(
        agent.doc().text_content(page.editor),
        "Thanks, Friday works."
    );

    let seen = bridge.seen();
    assert_eq!(seen.len(), 1);
    match &seen[0] {
        BridgeRequest::Generate {
            talking_points,
            thread_context,
        } => {
            assert_eq!(talking_points, "thank them, confirm Friday");
            assert!(thread_context
                .as_deref()
                .unwrap()
                .contains("quick question about the rollout"));
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn generate_button_submits_like_the_keyboard() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_draft("See you then.")]);
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    agent.submit_modal().await;

    assert_eq!(agent.modal().phase(), ModalPhase::Closed);
    assert_eq!(agent.doc().text_content(page.editor), "See you then.");
}

#[tokio::test]
async fn generate_button_click_runs_the_round_trip() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_draft("On my way.")]);
    let mut agent = PageAgent::new(page.doc, bridge.clone());
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    let generate = agent
        .doc()
        .find_first(agent.doc().root(), |d, id| {
            d.has_class(id, "mailquill-modal-generate")
        })
        .unwrap();
    agent.click(generate).await;

    assert_eq!(bridge.seen().len(), 1);
    assert_eq!(agent.modal().phase(), ModalPhase::Closed);
    assert_eq!(agent.doc().text_content(page.editor), "On my way.");
}

#[tokio::test]
async fn cancel_button_click_closes_the_dialog() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(page.doc, bridge.clone());
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    assert_eq!(agent.modal().phase(), ModalPhase::Open);

    let cancel = agent
        .doc()
        .find_first(agent.doc().root(), |d, id| {
            d.has_class(id, "mailquill-modal-cancel")
        })
        .unwrap();
    agent.click(cancel).await;

    assert_eq!(agent.modal().phase(), ModalPhase::Closed);
    assert!(bridge.seen().is_empty());
    assert!(agent
        .doc()
        .find_first(agent.doc().root(), |d, id| {
            d.tag(id) == Some("mailquill-modal")
        })
        .is_none());
}

#[tokio::test]
async fn trigger_click_prefills_from_selection_inside_region() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let text = agent.doc_mut().create_text("mention the budget");
    agent.doc_mut().append_child(page.editor, text);
    agent
        .doc_mut()
        .set_selection(Selection::Rich(RangeSnapshot::within_node(text, 0, 18)));

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;

    assert_eq!(
        agent.modal().input_value(agent.doc()),
        Some("mention the budget")
    );
}

#[tokio::test]
async fn failed_generate_keeps_dialog_open_with_error() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::failure("The request failed (429)")]);
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    agent.press_key(ModalKey::Enter { ctrl: true }).await;

    assert_eq!(agent.modal().phase(), ModalPhase::Open);
    assert_eq!(
        agent.modal().error_text(agent.doc()).as_deref(),
        Some("The request failed (429)")
    );
    assert_eq!(agent.doc().text_content(page.editor), "");
}

#[tokio::test]
async fn draft_for_dead_region_lands_on_clipboard_with_notice() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_draft("orphaned draft")]);
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    // The compose window goes away while the dialog is up.
    agent.doc_mut().remove(page.dialog);
    agent.press_key(ModalKey::Enter { ctrl: true }).await;

    assert_eq!(agent.clipboard().read(), Some("orphaned draft"));
    let banner = agent
        .doc()
        .find_first(agent.doc().root(), |d, id| {
            d.has_class(id, "mailquill-banner")
        })
        .unwrap();
    assert!(agent.doc().text_content(banner).contains("clipboard"));
}

#[tokio::test]
async fn improve_inside_compose_region_is_tagged_mail() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_text("polished words")]);
    let mut agent = PageAgent::new(page.doc, bridge.clone());
    agent.init();

    let text = agent.doc_mut().create_text("clumsy words");
    agent.doc_mut().append_child(page.editor, text);
    agent
        .doc_mut()
        .set_selection(Selection::Rich(RangeSnapshot::within_node(text, 0, 12)));

    agent.improve_selection().await;

    assert_eq!(agent.doc().text_content(page.editor), "polished words");
    match &bridge.seen()[0] {
        BridgeRequest::ImproveText { source, text, .. } => {
            assert_eq!(*source, SourceTag::Mail);
            assert_eq!(text, "clumsy words");
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn improve_outside_compose_region_is_tagged_general() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_text("better")]);
    let mut agent = PageAgent::new(page.doc, bridge.clone());
    agent.init();

    let root = agent.doc().root();
    let field = agent.doc_mut().create_element("input");
    agent.doc_mut().append_child(root, field);
    agent.doc_mut().set_value(field, "stray note");
    agent.doc_mut().set_selection(Selection::Range {
        node: field,
        start: 0,
        end: 5,
    });

    agent.improve_selection().await;

    assert_eq!(agent.doc().value(field), "better note");
    match &bridge.seen()[0] {
        BridgeRequest::ImproveText {
            source,
            thread_context,
            ..
        } => {
            assert_eq!(*source, SourceTag::General);
            assert!(thread_context.is_none());
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn improve_without_selection_dims_the_icon() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(page.doc, bridge.clone());
    agent.init();

    agent.improve_selection().await;

    assert_eq!(
        bridge.seen(),
        vec![BridgeRequest::SetIconState {
            state: IconState::Inactive
        }]
    );
}

#[tokio::test]
async fn failed_improve_shows_error_banner_and_leaves_text_alone() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::failure("No API key configured")]);
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let text = agent.doc_mut().create_text("unchanged");
    agent.doc_mut().append_child(page.editor, text);
    agent
        .doc_mut()
        .set_selection(Selection::Rich(RangeSnapshot::within_node(text, 0, 9)));

    agent.improve_selection().await;

    assert_eq!(agent.doc().text_content(page.editor), "unchanged");
    let banner = agent
        .doc()
        .find_first(agent.doc().root(), |d, id| {
            d.has_class(id, "mailquill-banner-error")
        })
        .unwrap();
    assert!(agent
        .doc()
        .text_content(banner)
        .contains("No API key configured"));
}

#[tokio::test]
async fn pump_injects_into_late_arriving_compose_window() {
    let mut doc = mailquill_dom::Document::new();
    let root = doc.root();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(doc, bridge);
    agent.init();
    assert!(agent.regions().is_empty());

    let dialog = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(dialog, "role", "dialog");
    agent.doc_mut().append_child(root, dialog);
    let editor = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(editor, "role", "textbox");
    agent.doc_mut().set_attr(editor, "contenteditable", "true");
    agent.doc_mut().set_attr(editor, "aria-label", "Message Body");
    agent.doc_mut().set_layout(editor, Layout::sized(560, 300));
    agent.doc_mut().append_child(dialog, editor);
    let row = agent.doc_mut().create_element("tr");
    agent.doc_mut().append_child(dialog, row);
    let send = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(send, "role", "button");
    let label = agent.doc_mut().create_text("Send");
    agent.doc_mut().append_child(send, label);
    agent.doc_mut().append_child(row, send);

    agent.pump();

    assert_eq!(agent.regions().len(), 1);
    assert!(trigger_button(agent.doc(), dialog).is_some());
}

#[tokio::test]
async fn one_batch_injects_at_most_one_region_and_tick_catches_up() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    // A second compose window appears in the same mutation batch.
    let root = agent.doc().root();
    let second = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(second, "role", "dialog");
    agent.doc_mut().append_child(root, second);
    let editor = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(editor, "role", "textbox");
    agent.doc_mut().set_attr(editor, "contenteditable", "true");
    agent.doc_mut().set_attr(editor, "aria-label", "Message Body");
    agent.doc_mut().set_layout(editor, Layout::sized(560, 300));
    agent.doc_mut().append_child(second, editor);
    let toolbar = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(toolbar, "role", "toolbar");
    agent.doc_mut().append_child(second, toolbar);

    agent.pump();
    // The first dialog already had controls, so the new one got this
    // batch's single injection.
    assert!(trigger_button(agent.doc(), second).is_some());

    // A third window appears together with churn; only one fresh
    // injection per pump, the tick sweep finishes the job.
    let third = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(third, "role", "dialog");
    agent.doc_mut().append_child(root, third);
    let editor3 = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(editor3, "role", "textbox");
    agent.doc_mut().set_attr(editor3, "contenteditable", "true");
    agent.doc_mut().set_attr(editor3, "aria-label", "Message Body");
    agent.doc_mut().set_layout(editor3, Layout::sized(560, 300));
    agent.doc_mut().append_child(third, editor3);
    let toolbar3 = agent.doc_mut().create_element("div");
    agent.doc_mut().set_attr(toolbar3, "role", "toolbar");
    agent.doc_mut().append_child(third, toolbar3);

    agent.tick(Instant::now());
    assert!(trigger_button(agent.doc(), third).is_some());
}

#[tokio::test]
async fn generate_trigger_without_compose_window_warns() {
    let doc = mailquill_dom::Document::new();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(doc, bridge.clone());
    agent.init();

    agent.handle_trigger(&BridgeRequest::TriggerGenerate).await;

    assert!(bridge.seen().is_empty());
    let banner = agent
        .doc()
        .find_first(agent.doc().root(), |d, id| {
            d.has_class(id, "mailquill-banner-warning")
        })
        .unwrap();
    assert!(agent
        .doc()
        .text_content(banner)
        .contains("compose window"));
}

#[tokio::test]
async fn banner_close_click_dismisses_it() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_draft("text")]);
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    agent.press_key(ModalKey::Enter { ctrl: true }).await;

    let close = agent
        .doc()
        .find_first(agent.doc().root(), |d, id| {
            d.has_class(id, "mailquill-banner-close")
        })
        .unwrap();
    agent.click(close).await;

    assert!(agent
        .doc()
        .find_first(agent.doc().root(), |d, id| d.has_class(id, "mailquill-banner"))
        .is_none());
}

#[tokio::test]
async fn navigation_resets_injected_state_and_dialog() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(Vec::new());
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    assert_eq!(agent.modal().phase(), ModalPhase::Open);

    agent.on_navigation();

    assert_eq!(agent.modal().phase(), ModalPhase::Closed);
    // The compose window survived this navigation, so controls come back
    // fresh in the same sweep.
    let buttons = agent
        .doc()
        .find_all(agent.doc().root(), |d, id| is_trigger(d, id));
    assert_eq!(buttons.len(), 1);
}

#[tokio::test]
async fn tick_expires_banners() {
    let page = mail_page();
    let bridge = ScriptedBridge::new(vec![BridgeResponse::ok_draft("text")]);
    let mut agent = PageAgent::new(page.doc, bridge);
    agent.init();

    let button = trigger_button(agent.doc(), page.dialog).unwrap();
    agent.click(button).await;
    agent.doc_mut().remove(page.dialog);
    agent.press_key(ModalKey::Enter { ctrl: true }).await;
    assert!(agent
        .doc()
        .find_first(agent.doc().root(), |d, id| d.has_class(id, "mailquill-banner"))
        .is_some());

    agent.tick(Instant::now() + std::time::Duration::from_secs(10));

    assert!(agent
        .doc()
        .find_first(agent.doc().root(), |d, id| d.has_class(id, "mailquill-banner"))
        .is_none());
}
