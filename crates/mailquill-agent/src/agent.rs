//! The page agent.
//!
//! Ties the pieces together against one document: discovery and injection
//! on mutations, the dialog flow for generation, and the capture/replace
//! flow for improvement. All state lives here; the background side is only
//! reachable through the [`Bridge`] seam.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use mailquill_dom::{Document, NodeId};
use mailquill_protocols::{Bridge, BridgeRequest, IconState, SourceTag};

use crate::banner::{BannerHost, Severity};
use crate::capture::{capture_selection, SelectionCapture};
use crate::clipboard::Clipboard;
use crate::commands::Command;
use crate::injector;
use crate::insert::{self, Applied};
use crate::locator::locate_compose_regions;
use crate::modal::{ModalClick, ModalController, ModalKey, ModalOutcome};
use crate::region::RegionHandle;
use crate::watcher::MutationWatcher;

const CLIPBOARD_NOTICE: &str = "Text copied to the clipboard";

pub struct PageAgent {
    doc: Document,
    bridge: Arc<dyn Bridge>,
    modal: ModalController,
    banners: BannerHost,
    watcher: MutationWatcher,
    clipboard: Clipboard,
    regions: Vec<RegionHandle>,
    /// The region the open dialog belongs to.
    active_region: Option<RegionHandle>,
}

impl PageAgent {
    pub fn new(doc: Document, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            doc,
            bridge,
            modal: ModalController::new(),
            banners: BannerHost::new(),
            watcher: MutationWatcher::new(),
            clipboard: Clipboard::new(),
            regions: Vec::new(),
            active_region: None,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn regions(&self) -> &[RegionHandle] {
        &self.regions
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    /// First scan on attach. Consumes construction-time mutations so the
    /// first pump starts from a clean queue.
    pub fn init(&mut self) {
        self.doc.take_mutations();
        self.rescan();
        info!(regions = self.regions.len(), "page agent attached");
    }

    /// Rediscover compose regions and inject controls into new ones.
    pub fn rescan(&mut self) {
        self.regions = locate_compose_regions(&self.doc);
        for region in &self.regions {
            injector::inject(&mut self.doc, region);
        }
        // Injection added nodes; keep them out of the next drain.
        self.watcher.observe(&mut self.doc);
        self.watcher.needs_rescan(&self.doc);
    }

    /// Buffer pending mutations and rescan when something relevant landed.
    /// At most one new injection per drained batch; the periodic tick
    /// catches any region this pass leaves bare.
    pub fn pump(&mut self) {
        self.watcher.observe(&mut self.doc);
        if !self.watcher.needs_rescan(&self.doc) {
            return;
        }
        self.regions = locate_compose_regions(&self.doc);
        for region in self.regions.clone() {
            let fresh = !self.doc.has_attr(region.root, injector::MARKER_ATTR);
            if injector::inject(&mut self.doc, &region) && fresh {
                break;
            }
        }
        self.watcher.observe(&mut self.doc);
        self.watcher.needs_rescan(&self.doc);
    }

    /// Periodic housekeeping: banner expiry plus a safety-net rescan for
    /// anything the mutation path missed.
    pub fn tick(&mut self, now: Instant) {
        self.banners.expire_due(&mut self.doc, now);
        self.pump();
        if self.regions.iter().any(|r| !r.is_alive(&self.doc)) || self.regions.is_empty() {
            self.rescan();
        }
    }

    /// The single-page app swapped views. Drop everything page-scoped.
    pub fn on_navigation(&mut self) {
        debug!("navigation: resetting page state");
        self.modal.abandon(&mut self.doc);
        self.banners.dismiss_all(&mut self.doc);
        injector::cleanup_all(&mut self.doc);
        self.active_region = None;
        self.rescan();
    }

    /// Route a click. Banner close controls, the dialog's own buttons, and
    /// injected triggers are handled here; everything else is offered to
    /// the dialog's backdrop handling.
    pub async fn click(&mut self, node: NodeId) {
        if self.banners.handle_click(&mut self.doc, node) {
            return;
        }
        // Submission and dismissal both refuse while a round trip is in
        // flight, matching the buttons' disabled state.
        match self.modal.classify_click(&self.doc, node) {
            Some(ModalClick::Generate) => {
                self.submit_modal().await;
                return;
            }
            Some(ModalClick::Cancel) => {
                if self.modal.close(&mut self.doc).is_ok() {
                    self.active_region = None;
                }
                return;
            }
            None => {}
        }
        if injector::is_trigger(&self.doc, node) {
            let region = self
                .regions
                .iter()
                .find(|r| r.owns(&self.doc, node))
                .cloned();
            if let Some(region) = region {
                self.open_generate_modal(region);
            }
            return;
        }
        if self.modal.backdrop_click(&mut self.doc, node) {
            self.active_region = None;
        }
    }

    /// Open the talking-points dialog for a compose region, prefilled from
    /// any selection inside that region.
    pub fn open_generate_modal(&mut self, region: RegionHandle) {
        let prefill = capture_selection(&self.doc)
            .filter(|capture| region.owns(&self.doc, capture.anchor()))
            .map(|capture| capture.text);
        if self
            .modal
            .open(&mut self.doc, prefill.as_deref())
            .is_err()
        {
            debug!("dialog already open, ignoring trigger");
            return;
        }
        self.active_region = Some(region);
    }

    /// Route a key event; drives the submit round trip when one results.
    pub async fn press_key(&mut self, key: ModalKey) {
        match self.modal.handle_key(&mut self.doc, key) {
            ModalOutcome::Submit(points) => self.run_generate(points).await,
            ModalOutcome::Closed => self.active_region = None,
            ModalOutcome::Ignored => {}
        }
    }

    /// Submit the open dialog programmatically (the Generate button).
    pub async fn submit_modal(&mut self) {
        match self.modal.begin_submit(&mut self.doc) {
            Ok(points) => self.run_generate(points).await,
            Err(error) => debug!(%error, "submit refused"),
        }
    }

    async fn run_generate(&mut self, talking_points: String) {
        let thread_context = self
            .active_region
            .as_ref()
            .and_then(|region| region.thread_context.clone());
        let response = self
            .bridge
            .send(BridgeRequest::Generate {
                talking_points,
                thread_context,
            })
            .await;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "The request failed".to_string());
            warn!(error = %message, "generate round trip failed");
            let _ = self.modal.fail_submit(&mut self.doc, &message);
            return;
        }

        let Some(draft) = response.draft else {
            let _ = self
                .modal
                .fail_submit(&mut self.doc, "The response carried no draft");
            return;
        };
        let _ = self.modal.finish(&mut self.doc);

        let region = self.active_region.take();
        match region {
            Some(region) if region.is_alive(&self.doc) => {
                let applied =
                    insert::append_to_region(&mut self.doc, &region, &draft, &mut self.clipboard);
                let (anchor, message) = if applied == Applied::Clipboard {
                    (self.doc.root(), CLIPBOARD_NOTICE)
                } else {
                    (region.root, "Draft inserted")
                };
                self.banners
                    .show(&mut self.doc, anchor, Severity::Info, message, Instant::now());
            }
            _ => {
                self.clipboard.write(draft);
                let root = self.doc.root();
                self.banners.show(
                    &mut self.doc,
                    root,
                    Severity::Info,
                    CLIPBOARD_NOTICE,
                    Instant::now(),
                );
            }
        }
    }

    /// The improve flow: capture, round trip, replace in place.
    pub async fn improve_selection(&mut self) {
        let Some(capture) = capture_selection(&self.doc) else {
            debug!("improve requested with nothing selected");
            self.bridge
                .send(BridgeRequest::SetIconState {
                    state: IconState::Inactive,
                })
                .await;
            return;
        };
        let source = self.classify_capture(&capture);
        let thread_context = match source {
            SourceTag::Mail => self
                .regions
                .iter()
                .find(|region| region.owns(&self.doc, capture.anchor()))
                .and_then(|region| region.thread_context.clone()),
            SourceTag::General => None,
        };

        let response = self
            .bridge
            .send(BridgeRequest::ImproveText {
                text: capture.text.clone(),
                thread_context,
                source,
            })
            .await;

        let root = self.doc.root();
        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "The request failed".to_string());
            warn!(error = %message, "improve round trip failed");
            self.banners
                .show(&mut self.doc, root, Severity::Error, &message, Instant::now());
            return;
        }
        let Some(improved) = response.text else {
            self.banners.show(
                &mut self.doc,
                root,
                Severity::Error,
                "The response carried no text",
                Instant::now(),
            );
            return;
        };

        let applied =
            insert::replace_capture(&mut self.doc, &capture, &improved, &mut self.clipboard);
        if applied == Applied::Clipboard {
            self.banners.show(
                &mut self.doc,
                root,
                Severity::Info,
                CLIPBOARD_NOTICE,
                Instant::now(),
            );
        }
    }

    /// A keyboard command relayed from the background.
    pub async fn handle_trigger(&mut self, request: &BridgeRequest) {
        match Command::from_request(request) {
            Some(Command::GenerateReply) => {
                let region = self
                    .regions
                    .iter()
                    .find(|region| region.is_alive(&self.doc))
                    .cloned();
                match region {
                    Some(region) => self.open_generate_modal(region),
                    None => {
                        let root = self.doc.root();
                        self.banners.show(
                            &mut self.doc,
                            root,
                            Severity::Warning,
                            "Open a compose window first",
                            Instant::now(),
                        );
                    }
                }
            }
            Some(Command::ImproveSelection) => self.improve_selection().await,
            None => debug!("ignoring non-trigger bridge message"),
        }
    }

    /// Selections inside a compose region are mail writing; anything else
    /// on the page is general text.
    fn classify_capture(&self, capture: &SelectionCapture) -> SourceTag {
        let anchor = capture.anchor();
        if self
            .regions
            .iter()
            .any(|region| region.owns(&self.doc, anchor))
        {
            SourceTag::Mail
        } else {
            SourceTag::General
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
