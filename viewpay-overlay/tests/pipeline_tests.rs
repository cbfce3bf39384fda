//! End-to-end pipeline tests: settings store, rate store, scheduler,
//! and overlay engine wired together the way the application runs them.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Mutex;

use viewpay_dom::Document;
use viewpay_fetch::{FetchError, RateSource};
use viewpay_overlay::{sample, FeedLocator, OverlayEngine, Scheduler, SchedulerConfig};
use viewpay_store::{RateStore, SettingsStore};

struct FixedRates;

#[async_trait]
impl RateSource for FixedRates {
    async fn usd_rate(&self, code: &str) -> Result<Decimal, FetchError> {
        match code {
            "usd" => Ok(Decimal::ONE),
            "eur" => Ok(dec!(0.5)),
            other => Err(FetchError::MissingRate {
                code: other.to_string(),
            }),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_settings_change_rerenders_overlays() {
    let dir = tempfile::TempDir::new().unwrap();
    let settings = Arc::new(SettingsStore::load(dir.path().join("settings.json")).await);
    let rates = RateStore::new(Arc::new(FixedRates));

    let doc = Arc::new(Mutex::new(Document::new()));
    let anchor = {
        let mut doc = doc.lock().await;
        sample::add_article(&mut doc, "2.1M");
        sample::add_post(&mut doc, "500")
    };

    let mut scheduler = Scheduler::new(
        OverlayEngine::new(FeedLocator::default()),
        doc.clone(),
        rates.clone(),
        SchedulerConfig::default(),
    )
    .await;
    let mut reports = scheduler.report_stream();
    let _watcher = rates.clone().watch_settings(settings.clone());
    tokio::spawn(scheduler.run());

    // The startup refresh paints the first overlays in USD.
    let first = reports.recv().await.unwrap();
    assert!(first.summary_updated);
    {
        let doc = doc.lock().await;
        assert_eq!(sample::summary_text(&doc).unwrap(), "$54.60");
        assert_eq!(sample::item_overlay_text(&doc, anchor).unwrap(), "$0.01300");
    }

    // Switching the currency re-renders every overlay in place.
    settings.set_currency_code("eur").await.unwrap();
    let second = reports.recv().await.unwrap();
    assert_eq!(second.items_injected, 0);
    {
        let doc = doc.lock().await;
        assert_eq!(sample::summary_text(&doc).unwrap(), "\u{20ac}27.30");
        assert_eq!(
            sample::item_overlay_text(&doc, anchor).unwrap(),
            "\u{20ac}0.00650"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_unknown_currency_keeps_previous_overlays() {
    let dir = tempfile::TempDir::new().unwrap();
    let settings = Arc::new(SettingsStore::load(dir.path().join("settings.json")).await);
    let rates = RateStore::new(Arc::new(FixedRates));

    let doc = Arc::new(Mutex::new(Document::new()));
    let anchor = {
        let mut doc = doc.lock().await;
        sample::add_post(&mut doc, "2.1M")
    };

    let mut scheduler = Scheduler::new(
        OverlayEngine::new(FeedLocator::default()),
        doc.clone(),
        rates.clone(),
        SchedulerConfig::default(),
    )
    .await;
    let mut reports = scheduler.report_stream();
    let _watcher = rates.clone().watch_settings(settings.clone());
    tokio::spawn(scheduler.run());

    reports.recv().await.unwrap();

    // The fetch for the new code fails; the store keeps USD and no
    // re-render signal fires.
    settings.set_currency_code("xxx").await.unwrap();
    let quiet = tokio::time::timeout(std::time::Duration::from_secs(5), reports.recv()).await;
    assert!(quiet.is_err());
    assert_eq!(
        sample::item_overlay_text(&*doc.lock().await, anchor).unwrap(),
        "$54.60"
    );
}
