//! Estimate command - convert a view count into an earnings estimate.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use tracing::info;

use viewpay_core::{count, currency, estimate, CurrencyState, FormatOptions};
use viewpay_fetch::{RateClient, RateSource};
use viewpay_store::SettingsStore;

use crate::output::{EstimateOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the estimate command.
#[derive(Args)]
pub struct EstimateArgs {
    /// View count, abbreviated or exact (e.g. "2.1M", "1,234").
    pub count: String,

    /// Currency code (e.g. "eur"). Defaults to the configured one.
    #[arg(long, short)]
    pub currency: Option<String>,

    /// Fixed units-per-USD rate, skipping the live fetch.
    #[arg(long)]
    pub rate: Option<Decimal>,
}

/// Runs the estimate command.
pub async fn run(args: &EstimateArgs, cli: &Cli) -> Result<()> {
    let count = count::parse(&args.count)?;

    let code = match &args.currency {
        Some(code) => code.clone(),
        None => SettingsStore::load_default().await.currency_code().await,
    };
    let state = resolve_state(&code, args.rate).await?;

    let amount = estimate::estimate_in(count, &state);
    let formatted = currency::format(amount, &state, FormatOptions::default());

    let output = EstimateOutput {
        text: args.count.clone(),
        count,
        currency: state.code.clone(),
        usd_rate: state.exchange_rate_to_usd,
        amount,
        formatted,
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_estimate(&output, cli.verbose));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}

/// A currency state for `code`: the USD identity, a caller-supplied
/// fixed rate, or the live rate from the exchange-rate service.
async fn resolve_state(code: &str, rate: Option<Decimal>) -> Result<CurrencyState> {
    if let Some(rate) = rate {
        return Ok(CurrencyState::new(code, rate)?);
    }
    if code.eq_ignore_ascii_case("usd") {
        return Ok(CurrencyState::default());
    }

    info!(code = %code, "Fetching live exchange rate");
    let client = RateClient::new()?;
    let rate = client.usd_rate(code).await?;
    Ok(CurrencyState::new(code, rate)?)
}
