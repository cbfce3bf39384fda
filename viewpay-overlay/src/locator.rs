//! Host-markup adapter.
//!
//! The engine never pattern-matches host markup directly; everything it
//! needs to know about the page lives behind [`AnchorLocator`]. When the
//! host ships a markup change, the locator is the only piece that needs
//! updating.

use viewpay_dom::{Document, NodeId};

/// Class marking an injected per-item overlay box.
pub const ESTIMATE_BOX_CLASS: &str = "estimate-box";

/// Class marking the injected summary estimate node.
pub const ESTIMATE_VALUE_CLASS: &str = "estimate-value";

/// Class marking the currency glyph node inside an overlay box.
pub const ESTIMATE_SYMBOL_CLASS: &str = "estimate-symbol";

/// Locates the host-markup anchors the overlay engine works from.
pub trait AnchorLocator: Send {
    /// Per-item view-count anchors in document order, excluding anchors
    /// that live inside an injected overlay box.
    fn view_count_anchors(&self, doc: &Document) -> Vec<NodeId>;

    /// Timestamp anchors of focused articles, in document order.
    fn date_anchors(&self, doc: &Document) -> Vec<NodeId>;

    /// The leaf node carrying the count (or estimate) figure under
    /// `scope`, skipping any injected glyph node.
    fn count_leaf(&self, doc: &Document, scope: NodeId) -> Option<NodeId>;

    /// The decorative count icon under `scope`, if any.
    fn icon_node(&self, doc: &Document, scope: NodeId) -> Option<NodeId>;

    /// The view-count anchor under `scope` (used to find the anchor
    /// inside a cloned overlay box).
    fn anchor_in(&self, doc: &Document, scope: NodeId) -> Option<NodeId>;
}

/// Locator for the feed markup the sample documents model: view-count
/// anchors carry a class, the count figure is the deepest trailing span,
/// and article timestamps are `time` elements three levels below their
/// date row.
pub struct FeedLocator {
    anchor_class: String,
    icon_class: String,
    date_tag: String,
}

impl Default for FeedLocator {
    fn default() -> Self {
        Self {
            anchor_class: "view-count-link".to_string(),
            icon_class: "count-icon".to_string(),
            date_tag: "time".to_string(),
        }
    }
}

impl FeedLocator {
    /// Creates a locator with custom markup hooks.
    pub fn new(anchor_class: &str, icon_class: &str, date_tag: &str) -> Self {
        Self {
            anchor_class: anchor_class.to_string(),
            icon_class: icon_class.to_string(),
            date_tag: date_tag.to_string(),
        }
    }
}

impl AnchorLocator for FeedLocator {
    fn view_count_anchors(&self, doc: &Document) -> Vec<NodeId> {
        doc.query(|d, n| d.has_class(n, &self.anchor_class) && !inside_overlay(d, n))
    }

    fn date_anchors(&self, doc: &Document) -> Vec<NodeId> {
        doc.query(|d, n| d.tag(n) == Some(self.date_tag.as_str()))
    }

    fn count_leaf(&self, doc: &Document, scope: NodeId) -> Option<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|&n| {
                doc.tag(n) == Some("span")
                    && doc.children(n).is_empty()
                    && !doc.has_class(n, ESTIMATE_SYMBOL_CLASS)
            })
            .next_back()
    }

    fn icon_node(&self, doc: &Document, scope: NodeId) -> Option<NodeId> {
        doc.find_descendant(scope, |d, n| d.has_class(n, &self.icon_class))
    }

    fn anchor_in(&self, doc: &Document, scope: NodeId) -> Option<NodeId> {
        doc.find_descendant(scope, |d, n| d.has_class(n, &self.anchor_class))
    }
}

/// Whether the node sits inside an injected overlay box.
fn inside_overlay(doc: &Document, id: NodeId) -> bool {
    let mut current = doc.parent(id);
    while let Some(node) = current {
        if doc.has_class(node, ESTIMATE_BOX_CLASS) {
            return true;
        }
        current = doc.parent(node);
    }
    false
}
