//! Deterministic sample feed markup.
//!
//! Builds documents shaped like the feed pages the default
//! [`FeedLocator`](crate::FeedLocator) targets: a focused article with a
//! date row, and list items whose view counts sit behind classed
//! anchors. Shared by the engine tests and the `watch` demo.

use viewpay_dom::{Document, NodeId};

use crate::locator::{ESTIMATE_BOX_CLASS, ESTIMATE_SYMBOL_CLASS, ESTIMATE_VALUE_CLASS};

/// Node handles into a sample focused article.
pub struct Article {
    /// The date row: `[date, separator, views]` before injection.
    pub container: NodeId,
    /// The views cell (third child of the row).
    pub views: NodeId,
    /// The leaf span holding the count figure.
    pub value: NodeId,
}

fn child(doc: &mut Document, parent: NodeId, tag: &str) -> NodeId {
    let id = doc.create_element(tag);
    doc.append_child(parent, id)
        .unwrap_or_else(|e| unreachable!("sample markup: {e}"));
    id
}

fn text_child(doc: &mut Document, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let id = child(doc, parent, tag);
    doc.set_text(id, text)
        .unwrap_or_else(|e| unreachable!("sample markup: {e}"));
    id
}

/// Appends a focused article whose date row reads `<count> Views`.
pub fn add_article(doc: &mut Document, count_text: &str) -> Article {
    let article = child(doc, doc.root(), "article");
    let container = child(doc, article, "div");

    let date_wrap = child(doc, container, "div");
    let date_link = child(doc, date_wrap, "a");
    text_child(doc, date_link, "time", "7:40 PM \u{b7} Aug 25, 2026");

    text_child(doc, container, "span", "\u{b7}");

    let views = child(doc, container, "div");
    let wrap = child(doc, views, "span");
    let value = text_child(doc, wrap, "span", count_text);
    text_child(doc, wrap, "span", " Views");

    Article {
        container,
        views,
        value,
    }
}

/// Appends an embedded quoted article: a date row with no views cell,
/// as rendered inside a quote card. Its timestamp precedes the focused
/// article's in document order.
pub fn add_quoted_stub(doc: &mut Document) -> NodeId {
    let quote = child(doc, doc.root(), "article");
    let container = child(doc, quote, "div");
    let date_wrap = child(doc, container, "div");
    let date_link = child(doc, date_wrap, "a");
    text_child(doc, date_link, "time", "1:02 PM \u{b7} Aug 24, 2026");
    container
}

/// Appends a feed item and returns its view-count anchor.
pub fn add_post(doc: &mut Document, count_text: &str) -> NodeId {
    let post = child(doc, doc.root(), "div");
    let stats = child(doc, post, "div");
    let stat = child(doc, stats, "div");

    let anchor = child(doc, stat, "a");
    doc.add_class(anchor, "view-count-link")
        .unwrap_or_else(|e| unreachable!("sample markup: {e}"));
    let icon = child(doc, anchor, "div");
    doc.add_class(icon, "count-icon")
        .unwrap_or_else(|e| unreachable!("sample markup: {e}"));
    let wrap = child(doc, anchor, "span");
    text_child(doc, wrap, "span", count_text);
    anchor
}

/// Rewrites the count figure behind a post's anchor.
pub fn set_count(doc: &mut Document, anchor: NodeId, count_text: &str) {
    let leaf = doc
        .descendants(anchor)
        .into_iter()
        .filter(|&n| {
            doc.tag(n) == Some("span")
                && doc.children(n).is_empty()
                && !doc.has_class(n, ESTIMATE_SYMBOL_CLASS)
        })
        .next_back();
    if let Some(leaf) = leaf {
        doc.set_text(leaf, count_text)
            .unwrap_or_else(|e| unreachable!("sample markup: {e}"));
    }
}

/// The rendered text of a post's overlay box, if one has been injected.
pub fn item_overlay_text(doc: &Document, anchor: NodeId) -> Option<String> {
    let host = doc.parent(anchor)?;
    let overlay = doc
        .next_sibling(host)
        .filter(|&n| doc.has_class(n, ESTIMATE_BOX_CLASS))?;
    Some(doc.text_content(overlay))
}

/// The rendered text of the article summary estimate, if injected.
pub fn summary_text(doc: &Document) -> Option<String> {
    let marker = doc
        .query(|d, n| d.has_class(n, ESTIMATE_VALUE_CLASS))
        .into_iter()
        .next()?;
    Some(doc.text_content(marker))
}
