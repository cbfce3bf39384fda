//! Reactive scheduler.
//!
//! Bridges the two change feeds, document mutations and applied rate
//! refreshes, into throttled engine passes. Bursts coalesce through the
//! watch channels: the first signal runs on the leading edge, everything
//! arriving inside the minimum interval folds into one trailing pass.
//!
//! The engine's own writes during a pass must not schedule another one.
//! After each pass the mutation receiver is marked seen unless the
//! document has moved past the revision the pass left behind, which only
//! happens when host mutations raced in mid-pass.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, trace};

use viewpay_dom::Document;
use viewpay_store::RateStore;

use crate::engine::{OverlayEngine, RunReport};
use crate::locator::AnchorLocator;

/// Default minimum interval between overlay passes.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// Configuration
// ============================================================================

/// Scheduler tuning.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Minimum time between the start of two overlay passes.
    pub min_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Executing,
    Idle,
}

// ============================================================================
// Scheduler
// ============================================================================

/// Drives an [`OverlayEngine`] from document and rate-store signals.
pub struct Scheduler<L: AnchorLocator> {
    engine: OverlayEngine<L>,
    doc: Arc<Mutex<Document>>,
    rates: Arc<RateStore>,
    mutations: watch::Receiver<u64>,
    renders: watch::Receiver<u64>,
    min_interval: Duration,
    last_run: Option<Instant>,
    phase: Phase,
    reports: Option<mpsc::UnboundedSender<RunReport>>,
}

impl<L: AnchorLocator> Scheduler<L> {
    /// Creates a scheduler subscribed to the document's mutation feed
    /// and the rate store's re-render feed.
    pub async fn new(
        engine: OverlayEngine<L>,
        doc: Arc<Mutex<Document>>,
        rates: Arc<RateStore>,
        config: SchedulerConfig,
    ) -> Self {
        let mutations = doc.lock().await.subscribe();
        let renders = rates.subscribe();
        Self {
            engine,
            doc,
            rates,
            mutations,
            renders,
            min_interval: config.min_interval,
            last_run: None,
            phase: Phase::Idle,
            reports: None,
        }
    }

    /// Opens a stream of per-pass reports, for observers and tests.
    pub fn report_stream(&mut self) -> mpsc::UnboundedReceiver<RunReport> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.reports = Some(tx);
        rx
    }

    /// Runs until both signal senders are gone.
    pub async fn run(mut self) {
        info!(
            min_interval_ms = u64::try_from(self.min_interval.as_millis()).unwrap_or(u64::MAX),
            "Overlay scheduler started"
        );
        loop {
            tokio::select! {
                changed = self.mutations.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = self.renders.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            self.phase = Phase::Pending;
            trace!(phase = ?self.phase, "Overlay pass requested");
            if let Some(delay) = throttle_delay(self.last_run, Instant::now(), self.min_interval) {
                tokio::time::sleep(delay).await;
            }
            // Give the host a chance to finish its own work first.
            tokio::task::yield_now().await;

            self.phase = Phase::Executing;
            // Mark the render signal seen before sampling the state: a
            // refresh landing after this point wakes us again.
            let _ = self.renders.borrow_and_update();
            let state = self.rates.current().await;

            let (report, end_revision) = {
                let mut doc = self.doc.lock().await;
                let report = self.engine.run(&mut doc, &state);
                (report, doc.revision())
            };
            debug!(phase = ?self.phase, ?report, code = %state.code, "Overlay pass finished");
            if let Some(tx) = &self.reports {
                let _ = tx.send(report);
            }

            // Swallow our own writes; host mutations that raced in keep
            // the channel hot for a follow-up pass.
            if *self.mutations.borrow() <= end_revision {
                let _ = self.mutations.borrow_and_update();
            }

            self.last_run = Some(Instant::now());
            self.phase = Phase::Idle;
        }
        info!("Overlay scheduler stopped");
    }
}

/// How long a pass starting `now` must still wait to honor the minimum
/// interval since `last_run`. `None` means run immediately.
fn throttle_delay(
    last_run: Option<Instant>,
    now: Instant,
    min_interval: Duration,
) -> Option<Duration> {
    let next = last_run? + min_interval;
    if now < next {
        Some(next - now)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::FeedLocator;
    use crate::sample;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use viewpay_fetch::{FetchError, RateSource};

    struct StubSource {
        rates: HashMap<&'static str, Decimal>,
    }

    impl StubSource {
        fn new(rates: &[(&'static str, Decimal)]) -> Self {
            Self {
                rates: rates.iter().copied().collect(),
            }
        }
    }

    #[async_trait]
    impl RateSource for StubSource {
        async fn usd_rate(&self, code: &str) -> Result<Decimal, FetchError> {
            self.rates
                .get(code)
                .copied()
                .ok_or_else(|| FetchError::MissingRate {
                    code: code.to_string(),
                })
        }
    }

    async fn scheduler_over(
        doc: &Arc<Mutex<Document>>,
        rates: &Arc<RateStore>,
    ) -> Scheduler<FeedLocator> {
        Scheduler::new(
            OverlayEngine::new(FeedLocator::default()),
            doc.clone(),
            rates.clone(),
            SchedulerConfig::default(),
        )
        .await
    }

    #[test]
    fn test_throttle_first_run_is_immediate() {
        let now = Instant::now();
        assert_eq!(throttle_delay(None, now, Duration::from_secs(1)), None);
    }

    #[test]
    fn test_throttle_within_interval_waits_the_remainder() {
        let last = Instant::now();
        let now = last + Duration::from_millis(300);
        assert_eq!(
            throttle_delay(Some(last), now, Duration::from_secs(1)),
            Some(Duration::from_millis(700))
        );
    }

    #[test]
    fn test_throttle_after_interval_is_immediate() {
        let last = Instant::now();
        let now = last + Duration::from_secs(2);
        assert_eq!(throttle_delay(Some(last), now, Duration::from_secs(1)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_leading_and_trailing_pass() {
        let doc = Arc::new(Mutex::new(Document::new()));
        {
            let mut doc = doc.lock().await;
            sample::add_post(&mut doc, "2.1M");
        }
        let rates = RateStore::new(Arc::new(StubSource::new(&[])));
        let mut scheduler = scheduler_over(&doc, &rates).await;
        let mut reports = scheduler.report_stream();
        tokio::spawn(scheduler.run());

        // A burst of host mutations before the first pass.
        {
            let mut doc = doc.lock().await;
            let anchor = sample::add_post(&mut doc, "500");
            sample::set_count(&mut doc, anchor, "501");
            sample::set_count(&mut doc, anchor, "502");
        }
        let first = reports.recv().await.unwrap();
        assert_eq!(first.items_injected, 2);

        // Mutations after the pass fold into one trailing pass.
        {
            let mut doc = doc.lock().await;
            sample::add_post(&mut doc, "1K");
        }
        let second = reports.recv().await.unwrap();
        assert_eq!(second.items_injected, 1);

        // Then the scheduler goes quiet: its own overlay writes do not
        // schedule further passes.
        let quiet = tokio::time::timeout(Duration::from_secs(5), reports.recv()).await;
        assert!(quiet.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_refresh_triggers_rerender() {
        let doc = Arc::new(Mutex::new(Document::new()));
        let anchor = {
            let mut doc = doc.lock().await;
            sample::add_post(&mut doc, "2.1M")
        };
        let rates = RateStore::new(Arc::new(StubSource::new(&[
            ("usd", Decimal::ONE),
            ("eur", dec!(0.5)),
        ])));
        let mut scheduler = scheduler_over(&doc, &rates).await;
        let mut reports = scheduler.report_stream();
        tokio::spawn(scheduler.run());

        // The document was built before the scheduler subscribed; the
        // first pass comes from the rate refresh signal.
        rates.refresh("eur").await.unwrap();
        let first = reports.recv().await.unwrap();
        assert_eq!(first.items_injected, 1);
        assert_eq!(
            sample::item_overlay_text(&*doc.lock().await, anchor).unwrap(),
            "\u{20ac}27.30"
        );

        // A later refresh rewrites in place.
        rates.refresh("usd").await.unwrap();
        let second = reports.recv().await.unwrap();
        assert_eq!(second.items_injected, 0);
        assert_eq!(
            sample::item_overlay_text(&*doc.lock().await, anchor).unwrap(),
            "$54.60"
        );
    }
}
