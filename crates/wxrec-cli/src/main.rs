//! wxrec - weather records maintenance
//!
//! Rebuilds all-time, yearly and monthly records from the monthly logs or
//! the day summary table, and lets an operator inspect or correct them.

mod args;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wxrec_config::AppConfig;

use crate::args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    wxrec_obs::init("wxrec", cli.log_format.into());

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load config")?,
    };
    info!("Loaded configuration: {:?}", config);

    match cli.command {
        Command::Rebuild { source, scope, now, save } => {
            commands::rebuild(&config, source, scope, now, save).await
        }
        Command::Show { scope } => commands::show(&config, scope).await,
        Command::Edit { scope, metric, value, timestamp } => {
            commands::edit(&config, scope, &metric, value, timestamp).await
        }
    }
}
