//! Watch command - live overlay demo on a simulated feed.

use anyhow::Result;
use clap::Args;
use std::io::{stdout, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::info;

use viewpay_dom::Document;
use viewpay_fetch::RateClient;
use viewpay_overlay::{sample, FeedLocator, OverlayEngine, Scheduler, SchedulerConfig};
use viewpay_store::{RateStore, SettingsStore};

use crate::output::TextFormatter;
use crate::Cli;

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between simulated feed updates.
    #[arg(long, short, default_value = "3")]
    pub interval: u64,

    /// Currency code for the session (persists as the default).
    #[arg(long, short)]
    pub currency: Option<String>,

    /// Minimum milliseconds between overlay passes.
    #[arg(long, default_value = "1000")]
    pub min_interval: u64,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    info!(interval = args.interval, "Starting watch mode");

    let settings = Arc::new(SettingsStore::load_default().await);
    if let Some(code) = &args.currency {
        settings.set_currency_code(code).await?;
    }
    let rates = RateStore::new(Arc::new(RateClient::new()?));

    // A small simulated feed: one focused article plus list items.
    let doc = Arc::new(Mutex::new(Document::new()));
    let anchors = {
        let mut doc = doc.lock().await;
        sample::add_article(&mut doc, "2.1M");
        vec![
            sample::add_post(&mut doc, "500"),
            sample::add_post(&mut doc, "1.2K"),
            sample::add_post(&mut doc, "87K"),
        ]
    };

    let mut scheduler = Scheduler::new(
        OverlayEngine::new(FeedLocator::default()),
        doc.clone(),
        rates.clone(),
        SchedulerConfig {
            min_interval: Duration::from_millis(args.min_interval),
        },
    )
    .await;
    let mut reports = scheduler.report_stream();
    let _rate_watcher = rates.clone().watch_settings(settings.clone());
    tokio::spawn(scheduler.run());

    // The simulator plays the host page: counts keep climbing.
    let sim_doc = doc.clone();
    let sim_anchors = anchors.clone();
    let step_secs = args.interval.max(1);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(step_secs));
        ticker.tick().await;
        let mut step: u64 = 0;
        loop {
            ticker.tick().await;
            step += 1;
            let mut doc = sim_doc.lock().await;
            for (weight, &anchor) in (1u64..).zip(sim_anchors.iter()) {
                let count = (step + 1) * 500 * weight + step * 37;
                sample::set_count(&mut doc, anchor, &count.to_string());
            }
        }
    });

    let formatter = TextFormatter::new(!cli.no_color);
    loop {
        let Some(report) = reports.recv().await else {
            break;
        };

        print!("\x1b[2J\x1b[H");
        stdout().flush()?;

        let now = chrono::Local::now();
        let state = rates.current().await;
        println!(
            "ViewPay Watch Mode - {} (feed updates: {step_secs}s)",
            now.format("%H:%M:%S")
        );
        println!("{}", "\u{2500}".repeat(50));
        println!();
        println!(
            "Currency: {} ({} per USD)",
            formatter.bold(&state.code),
            state.exchange_rate_to_usd
        );
        println!();

        let doc = doc.lock().await;
        if let Some(total) = sample::summary_text(&doc) {
            println!("Article views total  {}", formatter.green(&total));
        }
        for &anchor in &anchors {
            let count = doc.text_content(anchor);
            let estimate = sample::item_overlay_text(&doc, anchor).unwrap_or_default();
            println!("  {count:<12} {}", formatter.green(&estimate));
        }
        println!();
        println!(
            "{}",
            formatter.dim(&format!(
                "pass: {} injected, {} updated, {} skipped",
                report.items_injected, report.items_updated, report.items_skipped
            ))
        );
        println!("Press Ctrl+C to exit");
    }

    Ok(())
}
