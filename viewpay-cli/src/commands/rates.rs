//! Rates command - live USD exchange rates.

use anyhow::Result;
use clap::Args;

use viewpay_fetch::{RateClient, RateSource};

use crate::output::{JsonFormatter, RateOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the rates command.
#[derive(Args)]
pub struct RatesArgs {
    /// Currency code, e.g. "eur".
    pub code: String,

    /// Rate service base URL override.
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Runs the rates command.
pub async fn run(args: &RatesArgs, cli: &Cli) -> Result<()> {
    let client = match &args.base_url {
        Some(url) => RateClient::with_base_url(url)?,
        None => RateClient::new()?,
    };
    let rate = client.usd_rate(&args.code).await?;

    let output = RateOutput {
        code: args.code.to_uppercase(),
        usd_rate: rate,
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_rate(&output));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
