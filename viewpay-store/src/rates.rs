//! Exchange-rate state store.
//!
//! Holds the process-wide [`CurrencyState`]: the active currency code
//! and its USD exchange rate. `refresh` is the single write path; every
//! estimate computation reads a whole-record copy, so no reader can see
//! a code paired with a stale rate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use viewpay_core::CurrencyState;
use viewpay_fetch::RateSource;

use crate::error::StoreError;
use crate::settings::SettingsStore;

struct Inner {
    state: CurrencyState,
    applied_seq: u64,
}

/// Process-wide currency state with a single refresh write path.
///
/// Refreshes are sequence-stamped at issue time: a response that
/// completes after a later-issued refresh has already been applied is
/// discarded, so out-of-order network completions can never roll the
/// state back.
pub struct RateStore {
    inner: Arc<RwLock<Inner>>,
    source: Arc<dyn RateSource>,
    issued: AtomicU64,
    notify: watch::Sender<u64>,
}

impl RateStore {
    /// Creates a store at the USD identity state.
    pub fn new(source: Arc<dyn RateSource>) -> Arc<Self> {
        let (notify, _) = watch::channel(0);
        Arc::new(Self {
            inner: Arc::new(RwLock::new(Inner {
                state: CurrencyState::default(),
                applied_seq: 0,
            })),
            source,
            issued: AtomicU64::new(0),
            notify,
        })
    }

    /// A whole-record copy of the current state.
    pub async fn current(&self) -> CurrencyState {
        self.inner.read().await.state.clone()
    }

    /// Fetches the rate for `code` and replaces the state.
    ///
    /// On failure the previous state stays in place (stale-but-available)
    /// and the error is returned for the caller to log or surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or the fetched rate violates
    /// the positive-rate invariant.
    pub async fn refresh(&self, code: &str) -> Result<CurrencyState, StoreError> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(code = %code, seq, "Refreshing exchange rate");

        let rate = self.source.usd_rate(code).await?;
        let state = CurrencyState::new(code, rate)?;

        {
            let mut inner = self.inner.write().await;
            if seq < inner.applied_seq {
                debug!(code = %code, seq, applied = inner.applied_seq, "Discarding stale refresh");
                return Ok(inner.state.clone());
            }
            inner.state = state.clone();
            inner.applied_seq = seq;
        }

        info!(code = %state.code, rate = %state.exchange_rate_to_usd, "Currency state updated");
        let _ = self.notify.send(seq);
        Ok(state)
    }

    /// Subscribes to the re-render signal emitted after each applied
    /// refresh.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Performs the startup refresh and follows every settings change.
    ///
    /// This is the only place that drives `refresh`: once at startup
    /// with the persisted code, then once per settings-change
    /// notification. Failures are logged and the previous state kept.
    pub fn watch_settings(self: Arc<Self>, settings: Arc<SettingsStore>) -> JoinHandle<()> {
        let mut rx = settings.subscribe();
        tokio::spawn(async move {
            let code = settings.currency_code().await;
            if let Err(e) = self.refresh(&code).await {
                warn!(code = %code, error = %e, "Startup rate refresh failed, keeping USD identity");
            }

            while rx.changed().await.is_ok() {
                let code = settings.currency_code().await;
                if let Err(e) = self.refresh(&code).await {
                    warn!(code = %code, error = %e, "Rate refresh failed, keeping previous state");
                }
            }
        })
    }
}
