// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! ViewPay CLI - earnings estimates for feed view counts.
//!
//! # Examples
//!
//! ```bash
//! # Estimate for an abbreviated view count
//! viewpay estimate 2.1M
//!
//! # In another currency, using the live exchange rate
//! viewpay estimate 2.1M --currency eur
//!
//! # Just resolve the raw count
//! viewpay parse "1,234"
//!
//! # Current USD exchange rate for a code
//! viewpay rates eur
//!
//! # List available currency codes
//! viewpay currencies
//!
//! # Persist a default currency
//! viewpay config set-currency eur
//!
//! # Live overlay demo on a simulated feed
//! viewpay watch
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, currencies, estimate, parse, rates, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// ViewPay CLI - earnings estimates for feed view counts.
#[derive(Parser)]
#[command(name = "viewpay")]
#[command(about = "Earnings estimates for feed view counts")]
#[command(long_about = r#"
ViewPay converts abbreviated view counts ("2.1M", "1,5 Mio.") into
estimated earnings, optionally in a non-USD currency at the live
exchange rate.

Examples:
  viewpay estimate 2.1M              # Estimate in the default currency
  viewpay estimate 2.1M -c eur       # In euros, live rate
  viewpay parse "12,345"             # Resolve the raw count only
  viewpay rates jpy                  # Current USD exchange rate
  viewpay currencies                 # Available currency codes
  viewpay config set-currency eur    # Persist a default currency
  viewpay watch                      # Live overlay demo
"#)]
#[command(version)]
#[command(author = "ViewPay Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a view count into an earnings estimate.
    #[command(visible_alias = "e")]
    Estimate(estimate::EstimateArgs),

    /// Resolve an abbreviated count to an exact integer.
    #[command(visible_alias = "p")]
    Parse(parse::ParseArgs),

    /// Show the live USD exchange rate for a currency.
    #[command(visible_alias = "r")]
    Rates(rates::RatesArgs),

    /// List available currency codes.
    #[command(visible_alias = "l")]
    Currencies(currencies::CurrenciesArgs),

    /// Watch a simulated feed with live overlays.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// The count text could not be parsed.
    ParseError = 3,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("viewpay=debug,info")
    } else {
        EnvFilter::new("viewpay=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Estimate(args) => estimate::run(args, &cli).await,
        Commands::Parse(args) => parse::run(args, &cli),
        Commands::Rates(args) => rates::run(args, &cli).await,
        Commands::Currencies(args) => currencies::run(args, &cli).await,
        Commands::Watch(args) => watch::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        let code = if e.downcast_ref::<viewpay_core::ParseError>().is_some() {
            ExitCode::ParseError
        } else {
            ExitCode::Error
        };
        std::process::exit(code as i32);
    }

    Ok(())
}
