//! In-page status banners.
//!
//! Transient feedback rendered near the surface it concerns: each anchor
//! element gets a lazily created container that lives exactly as long as
//! it has banners. Expiry is driven by the caller's clock (the agent
//! sweeps due banners from its tick), so nothing here owns a timer.

use std::time::{Duration, Instant};

use tracing::debug;

use mailquill_dom::{Document, NodeId};

/// Class on a banner container element.
pub const BANNER_HOST_CLASS: &str = "mailquill-banners";

/// Class on the per-banner close control.
pub const BANNER_CLOSE_CLASS: &str = "mailquill-banner-close";

const DEFAULT_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn class(self) -> &'static str {
        match self {
            Severity::Info => "mailquill-banner mailquill-banner-info",
            Severity::Warning => "mailquill-banner mailquill-banner-warning",
            Severity::Error => "mailquill-banner mailquill-banner-error",
        }
    }

    /// ARIA live-region role for the banner element.
    fn role(self) -> &'static str {
        match self {
            Severity::Info => "status",
            Severity::Warning => "status",
            Severity::Error => "alert",
        }
    }
}

struct LiveBanner {
    node: NodeId,
    host: NodeId,
    close: NodeId,
    deadline: Option<Instant>,
}

/// Owner of every banner this extension has put on the page.
pub struct BannerHost {
    ttl: Duration,
    live: Vec<LiveBanner>,
}

impl Default for BannerHost {
    fn default() -> Self {
        Self::new()
    }
}

impl BannerHost {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// A zero TTL makes banners persistent until dismissed.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            live: Vec::new(),
        }
    }

    /// Show a banner under `anchor`, stamped against the caller's clock.
    pub fn show(
        &mut self,
        doc: &mut Document,
        anchor: NodeId,
        severity: Severity,
        message: &str,
        now: Instant,
    ) -> NodeId {
        let host = ensure_host(doc, anchor);
        let banner = doc.create_element("div");
        doc.set_attr(banner, "class", severity.class());
        doc.set_attr(banner, "role", severity.role());
        let text = doc.create_text(message);
        doc.append_child(banner, text);
        let close = doc.create_element("button");
        doc.set_attr(close, "class", BANNER_CLOSE_CLASS);
        doc.set_attr(close, "aria-label", "Dismiss");
        doc.append_child(banner, close);
        doc.append_child(host, banner);

        let deadline = (!self.ttl.is_zero()).then(|| now + self.ttl);
        self.live.push(LiveBanner {
            node: banner,
            host,
            close,
            deadline,
        });
        debug!(?severity, text = message, "banner shown");
        banner
    }

    /// Route a click; dismisses the banner whose close control was hit.
    pub fn handle_click(&mut self, doc: &mut Document, node: NodeId) -> bool {
        let hit = self.live.iter().position(|banner| {
            node == banner.close || doc.ancestors(node).contains(&banner.close)
        });
        match hit {
            Some(index) => {
                let banner = self.live.remove(index);
                remove_banner(doc, &banner);
                self.sweep_empty_hosts(doc);
                true
            }
            None => false,
        }
    }

    /// Remove every banner whose deadline has passed. Returns how many went.
    pub fn expire_due(&mut self, doc: &mut Document, now: Instant) -> usize {
        let mut removed = 0;
        self.live.retain(|banner| {
            let due = banner.deadline.is_some_and(|deadline| deadline <= now);
            if due {
                remove_banner(doc, banner);
                removed += 1;
            }
            !due
        });
        if removed > 0 {
            self.sweep_empty_hosts(doc);
        }
        removed
    }

    pub fn dismiss_all(&mut self, doc: &mut Document) {
        for banner in self.live.drain(..) {
            remove_banner(doc, &banner);
        }
        self.sweep_empty_hosts(doc);
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// A container with no banners left has no reason to stay in the page.
    fn sweep_empty_hosts(&self, doc: &mut Document) {
        let hosts = doc.find_all(doc.root(), |d, id| d.has_class(id, BANNER_HOST_CLASS));
        for host in hosts {
            let occupied = self.live.iter().any(|banner| banner.host == host);
            if !occupied && doc.children(host).is_empty() {
                doc.remove(host);
            }
        }
    }
}

fn remove_banner(doc: &mut Document, banner: &LiveBanner) {
    doc.remove(banner.node);
}

fn ensure_host(doc: &mut Document, anchor: NodeId) -> NodeId {
    if let Some(host) = doc
        .children(anchor)
        .iter()
        .copied()
        .find(|id| doc.has_class(*id, BANNER_HOST_CLASS))
    {
        return host;
    }
    let host = doc.create_element("div");
    doc.set_attr(host, "class", BANNER_HOST_CLASS);
    doc.prepend_child(anchor, host);
    host
}

#[cfg(test)]
#[path = "banner_tests.rs"]
mod tests;
