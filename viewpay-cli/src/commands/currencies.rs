//! Currencies command - list the codes the rate service knows.

use anyhow::Result;
use clap::Args;

use viewpay_fetch::RateClient;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the currencies command.
#[derive(Args)]
pub struct CurrenciesArgs {
    /// Rate service base URL override.
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Runs the currencies command.
pub async fn run(args: &CurrenciesArgs, cli: &Cli) -> Result<()> {
    let client = match &args.base_url {
        Some(url) => RateClient::with_base_url(url)?,
        None => RateClient::new()?,
    };
    let names = client.currency_names().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_currencies(&names));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&names)?);
        }
    }

    Ok(())
}
