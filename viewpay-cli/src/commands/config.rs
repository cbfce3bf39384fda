//! Config command - manage the persisted currency preference.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use viewpay_fetch::{RateClient, RateSource};
use viewpay_store::{default_config_dir, default_settings_path, SettingsStore};

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the default currency code.
    SetCurrency {
        /// Currency code, e.g. "eur".
        code: String,

        /// Skip the live validation fetch.
        #[arg(long)]
        force: bool,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::SetCurrency { code, force } => set_currency(code, *force).await,
        ConfigAction::Reset => reset_config().await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await;
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("ViewPay Configuration");
            println!("{}", "\u{2500}".repeat(40));
            println!();
            println!("Default currency: {}", settings.currency_code.to_uppercase());
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "\u{2500}".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_currency(code: &str, force: bool) -> Result<()> {
    let code = code.trim().to_lowercase();

    if !force {
        let client = RateClient::new()?;
        client
            .usd_rate(&code)
            .await
            .map_err(|e| anyhow::anyhow!("Unknown or unavailable currency {code:?}: {e}"))?;
    }

    let store = SettingsStore::load_default().await;
    store.set_currency_code(&code).await?;

    info!(code = %code, "Default currency updated");
    println!("Default currency set to: {}", code.to_uppercase());

    Ok(())
}

async fn reset_config() -> Result<()> {
    let path = default_settings_path();

    if path.exists() {
        tokio::fs::remove_file(&path).await?;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
