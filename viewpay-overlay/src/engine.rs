//! Overlay engine.
//!
//! One call to [`OverlayEngine::run`] is a full document pass. For the
//! focused article it keeps a summary estimate next to the view total;
//! for every per-item view-count anchor it keeps an overlay box next to
//! the count. Structure is injected at most once per target; values are
//! rewritten in place on every pass, so a currency change re-renders
//! without duplicating markup.
//!
//! A malformed or missing target is skipped, never fatal: the pass
//! continues with the remaining anchors and the skip is counted in the
//! returned [`RunReport`].

use std::collections::HashSet;
use tracing::{debug, trace};

use viewpay_core::{count, currency, estimate, CurrencyState, FormatOptions};
use viewpay_dom::{Document, NodeId};

use crate::locator::{
    AnchorLocator, ESTIMATE_BOX_CLASS, ESTIMATE_SYMBOL_CLASS, ESTIMATE_VALUE_CLASS,
};

// ============================================================================
// Run Report
// ============================================================================

/// What a single engine pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Per-item overlay boxes injected this pass.
    pub items_injected: usize,
    /// Per-item estimates written (or confirmed) this pass.
    pub items_updated: usize,
    /// Anchors skipped over missing structure or unparseable counts.
    pub items_skipped: usize,
    /// Whether the article summary estimate was written this pass.
    pub summary_updated: bool,
}

struct ItemOutcome {
    injected: bool,
    updated: bool,
}

// ============================================================================
// Engine
// ============================================================================

/// Injects and refreshes estimate overlays across a document.
///
/// The engine remembers which anchors already carry an overlay in a
/// processed set keyed by node id; ids of removed subtrees are pruned at
/// the start of each pass, so a re-added anchor is treated as new.
pub struct OverlayEngine<L: AnchorLocator> {
    locator: L,
    processed: HashSet<NodeId>,
}

impl<L: AnchorLocator> OverlayEngine<L> {
    /// Creates an engine for the given host-markup locator.
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            processed: HashSet::new(),
        }
    }

    /// Runs a full overlay pass with the given currency state.
    ///
    /// Idempotent: a second pass with the same document and state
    /// changes nothing and does not bump the document revision.
    pub fn run(&mut self, doc: &mut Document, state: &CurrencyState) -> RunReport {
        self.processed.retain(|&id| doc.contains(id));

        let mut report = RunReport {
            summary_updated: self.update_summary(doc, state).is_some(),
            ..RunReport::default()
        };

        for anchor in self.locator.view_count_anchors(doc) {
            match self.process_item(doc, state, anchor) {
                Some(outcome) => {
                    if outcome.injected {
                        report.items_injected += 1;
                    }
                    if outcome.updated {
                        report.items_updated += 1;
                    } else {
                        report.items_skipped += 1;
                    }
                }
                None => {
                    report.items_skipped += 1;
                    trace!(?anchor, "Skipped view-count anchor with missing structure");
                }
            }
        }

        debug!(
            injected = report.items_injected,
            updated = report.items_updated,
            skipped = report.items_skipped,
            summary = report.summary_updated,
            "Overlay pass complete"
        );
        report
    }

    // ========================================================================
    // Article Summary
    // ========================================================================

    /// The focused article's date row. When the first timestamp belongs
    /// to an embedded quote (a row with no views cell), the focused
    /// article's row is found from the second timestamp instead.
    fn summary_container(&self, doc: &Document) -> Option<NodeId> {
        let dates = self.locator.date_anchors(doc);
        let first = *dates.first()?;
        let container = doc.ancestor(first, 3)?;
        if doc.children(container).len() == 1 {
            let second = *dates.get(1)?;
            return doc.ancestor(second, 3);
        }
        Some(container)
    }

    fn update_summary(&mut self, doc: &mut Document, state: &CurrencyState) -> Option<()> {
        let container = self.summary_container(doc)?;
        if doc.children(container).len() < 4 {
            self.inject_summary(doc, container)?;
        }

        let views = doc.child(container, 2)?;
        let raw = doc.text_content(views);
        let count = match count::parse(&raw) {
            Ok(count) => count,
            Err(e) => {
                trace!(raw = %raw, error = %e, "Skipping summary with unparseable view total");
                return None;
            }
        };
        let amount = estimate::estimate_in(count, state);
        let text = currency::format(amount, state, FormatOptions::default());

        let marker = doc.find_descendant(container, |d, n| d.has_class(n, ESTIMATE_VALUE_CLASS))?;
        let leaf = self.locator.count_leaf(doc, marker)?;
        doc.set_text(leaf, &text).ok()
    }

    /// Clones the separator and views cells so the row reads
    /// `[date, sep, views, sep, estimate]`, dropping the label from the
    /// estimate cell.
    fn inject_summary(&self, doc: &mut Document, container: NodeId) -> Option<()> {
        let sep = doc.child(container, 1)?;
        let views = doc.child(container, 2)?;

        let sep_clone = doc.clone_subtree(sep).ok()?;
        let views_clone = doc.clone_subtree(views).ok()?;
        doc.add_class(views_clone, ESTIMATE_VALUE_CLASS).ok()?;
        if let Some(wrap) = doc.find_descendant(views_clone, |d, n| d.tag(n) == Some("span")) {
            if let Some(label) = doc.child(wrap, 1) {
                doc.remove(label).ok()?;
            }
        }

        doc.insert_after(views, sep_clone).ok()?;
        doc.insert_after(sep_clone, views_clone).ok()?;
        trace!(?container, "Injected article summary estimate");
        Some(())
    }

    // ========================================================================
    // Per-Item Overlays
    // ========================================================================

    fn process_item(
        &mut self,
        doc: &mut Document,
        state: &CurrencyState,
        anchor: NodeId,
    ) -> Option<ItemOutcome> {
        let host = doc.parent(anchor)?;

        let mut injected = false;
        if !self.processed.contains(&anchor) {
            self.inject_item_overlay(doc, state, host)?;
            self.processed.insert(anchor);
            injected = true;
        }

        let overlay = doc
            .next_sibling(host)
            .filter(|&n| doc.has_class(n, ESTIMATE_BOX_CLASS))?;

        // Keep the glyph current across currency changes.
        if let Some(glyph) =
            doc.find_descendant(overlay, |d, n| d.has_class(n, ESTIMATE_SYMBOL_CLASS))
        {
            doc.set_text(glyph, &glyph_char(state)).ok()?;
        }

        let raw = doc.text_content(anchor);
        if raw.trim().is_empty() {
            // The host has not rendered this count yet; the value
            // self-heals on a later pass.
            return Some(ItemOutcome {
                injected,
                updated: false,
            });
        }
        let count = match count::parse(&raw) {
            Ok(count) => count,
            Err(e) => {
                trace!(raw = %raw, error = %e, "Skipping unparseable view count");
                return Some(ItemOutcome {
                    injected,
                    updated: false,
                });
            }
        };

        let amount = estimate::estimate_in(count, state);
        let text = currency::format(amount, state, FormatOptions { with_symbol: false });
        let leaf = self.locator.count_leaf(doc, overlay)?;
        doc.set_text(leaf, &text).ok()?;

        Some(ItemOutcome {
            injected,
            updated: true,
        })
    }

    /// Clones the anchor's host cell into an overlay box sitting right
    /// after it, swapping the count icon for a currency glyph.
    fn inject_item_overlay(
        &self,
        doc: &mut Document,
        state: &CurrencyState,
        host: NodeId,
    ) -> Option<()> {
        let overlay = doc.clone_subtree(host).ok()?;
        doc.add_class(overlay, ESTIMATE_BOX_CLASS).ok()?;

        if let Some(icon) = self.locator.icon_node(doc, overlay) {
            doc.remove(icon).ok()?;
        }

        let clone_anchor = self.locator.anchor_in(doc, overlay)?;
        let glyph = doc.create_element("span");
        doc.add_class(glyph, ESTIMATE_SYMBOL_CLASS).ok()?;
        doc.set_text(glyph, &glyph_char(state)).ok()?;
        doc.insert_child_at(clone_anchor, 0, glyph).ok()?;

        doc.insert_after(host, overlay).ok()?;
        trace!(?host, ?overlay, "Injected per-item overlay");
        Some(())
    }
}

/// The symbol truncated to one character, to fit the icon slot it
/// replaces. Multi-character symbols (CHF, the pseudo fallback) keep
/// only their lead character here; the summary shows the full symbol.
fn glyph_char(state: &CurrencyState) -> String {
    currency::symbol_of(state).chars().take(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::FeedLocator;
    use crate::sample;
    use rust_decimal_macros::dec;

    fn engine() -> OverlayEngine<FeedLocator> {
        OverlayEngine::new(FeedLocator::default())
    }

    fn usd() -> CurrencyState {
        CurrencyState::default()
    }

    #[test]
    fn test_item_overlay_renders_estimate() {
        let mut doc = Document::new();
        let anchor = sample::add_post(&mut doc, "2.1M");

        let report = engine().run(&mut doc, &usd());
        assert_eq!(report.items_injected, 1);
        assert_eq!(report.items_updated, 1);
        assert_eq!(sample::item_overlay_text(&doc, anchor).unwrap(), "$54.60");
    }

    #[test]
    fn test_small_estimate_keeps_precision() {
        let mut doc = Document::new();
        let anchor = sample::add_post(&mut doc, "500");

        engine().run(&mut doc, &usd());
        assert_eq!(sample::item_overlay_text(&doc, anchor).unwrap(), "$0.01300");
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut doc = Document::new();
        sample::add_article(&mut doc, "2.1M");
        sample::add_post(&mut doc, "500");
        sample::add_post(&mut doc, "1.2K");

        let mut engine = engine();
        engine.run(&mut doc, &usd());
        let outline = doc.outline();
        let revision = doc.revision();

        let report = engine.run(&mut doc, &usd());
        assert_eq!(report.items_injected, 0);
        assert_eq!(doc.outline(), outline);
        assert_eq!(doc.revision(), revision);
    }

    #[test]
    fn test_currency_change_rewrites_in_place() {
        let mut doc = Document::new();
        let anchor = sample::add_post(&mut doc, "2.1M");
        let mut engine = engine();

        engine.run(&mut doc, &usd());
        let eur = CurrencyState::new("eur", dec!(0.5)).unwrap();
        let report = engine.run(&mut doc, &eur);

        // Same box, new value and glyph. 54.60 USD at 0.5 is 27.30.
        assert_eq!(report.items_injected, 0);
        assert_eq!(
            sample::item_overlay_text(&doc, anchor).unwrap(),
            "\u{20ac}27.30"
        );
    }

    #[test]
    fn test_summary_estimate_next_to_view_total() {
        let mut doc = Document::new();
        let article = sample::add_article(&mut doc, "2.1M");

        let report = engine().run(&mut doc, &usd());
        assert!(report.summary_updated);
        assert_eq!(sample::summary_text(&doc).unwrap(), "$54.60");
        // Row now reads [date, sep, views, sep, estimate].
        assert_eq!(doc.children(article.container).len(), 5);
    }

    #[test]
    fn test_summary_tracks_live_view_total() {
        let mut doc = Document::new();
        let article = sample::add_article(&mut doc, "2.1M");
        let mut engine = engine();
        engine.run(&mut doc, &usd());

        doc.set_text(article.value, "4.2M").unwrap();
        engine.run(&mut doc, &usd());
        assert_eq!(sample::summary_text(&doc).unwrap(), "$109.20");
        assert_eq!(doc.children(article.container).len(), 5);
    }

    #[test]
    fn test_quoted_article_uses_second_timestamp() {
        let mut doc = Document::new();
        sample::add_quoted_stub(&mut doc);
        let article = sample::add_article(&mut doc, "2.1M");

        let report = engine().run(&mut doc, &usd());
        assert!(report.summary_updated);
        assert_eq!(doc.children(article.container).len(), 5);
        assert_eq!(sample::summary_text(&doc).unwrap(), "$54.60");
    }

    #[test]
    fn test_malformed_count_does_not_stop_the_pass() {
        let mut doc = Document::new();
        let bad = sample::add_post(&mut doc, "soon");
        let good = sample::add_post(&mut doc, "1K");

        let report = engine().run(&mut doc, &usd());
        assert_eq!(report.items_updated, 1);
        assert_eq!(report.items_skipped, 1);
        assert_eq!(sample::item_overlay_text(&doc, good).unwrap(), "$0.02600");
        // The malformed item still got its box, value pending.
        assert!(sample::item_overlay_text(&doc, bad).is_some());
    }

    #[test]
    fn test_empty_count_self_heals_on_later_pass() {
        let mut doc = Document::new();
        let anchor = sample::add_post(&mut doc, "");
        let mut engine = engine();

        let report = engine.run(&mut doc, &usd());
        assert_eq!(report.items_skipped, 1);

        sample::set_count(&mut doc, anchor, "1K");
        let report = engine.run(&mut doc, &usd());
        assert_eq!(report.items_updated, 1);
        assert_eq!(sample::item_overlay_text(&doc, anchor).unwrap(), "$0.02600");
    }

    #[test]
    fn test_removed_items_are_pruned_from_processed_set() {
        let mut doc = Document::new();
        let anchor = sample::add_post(&mut doc, "1K");
        let mut engine = engine();
        engine.run(&mut doc, &usd());
        assert_eq!(engine.processed.len(), 1);

        // The host tears the item down; the stale id must not pin the
        // processed set forever.
        let post = doc.ancestor(anchor, 3).unwrap();
        doc.remove(post).unwrap();
        let report = engine.run(&mut doc, &usd());
        assert!(engine.processed.is_empty());
        assert_eq!(report.items_injected, 0);

        let fresh = sample::add_post(&mut doc, "2K");
        let report = engine.run(&mut doc, &usd());
        assert_eq!(report.items_injected, 1);
        assert_eq!(sample::item_overlay_text(&doc, fresh).unwrap(), "$0.05200");
    }

    #[test]
    fn test_glyph_falls_back_for_unknown_code() {
        let mut doc = Document::new();
        let anchor = sample::add_post(&mut doc, "2.1M");
        let zzz = CurrencyState::new("zzz", dec!(1)).unwrap();

        engine().run(&mut doc, &zzz);
        assert_eq!(sample::item_overlay_text(&doc, anchor).unwrap(), "Z54.60");
    }
}
