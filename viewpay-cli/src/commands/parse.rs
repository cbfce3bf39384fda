//! Parse command - resolve an abbreviated count to an exact integer.

use anyhow::Result;
use clap::Args;

use crate::output::{JsonFormatter, ParseOutput};
use crate::{Cli, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Count text, e.g. "2.1M", "1,5 Mio." or "1,234".
    pub text: String,
}

/// Runs the parse command.
pub fn run(args: &ParseArgs, cli: &Cli) -> Result<()> {
    let count = viewpay_core::count::parse(&args.text)?;

    match cli.format {
        OutputFormat::Text => println!("{count}"),
        OutputFormat::Json => {
            let output = ParseOutput {
                text: args.text.clone(),
                count,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
