//! Command line arguments

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wxrec_core::Scope;
use wxrec_obs::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "wxrec", version, about = "Weather station records from logs or the day file")]
pub struct Cli {
    /// Path to the TOML configuration
    #[arg(long, global = true, env = "WXREC_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "json")]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recompute records from history
    Rebuild {
        #[arg(long, value_enum, default_value = "logs")]
        source: Source,

        /// One scope (alltime, year, month, 1-12); every scope if omitted
        #[arg(long)]
        scope: Option<Scope>,

        /// Treat this as the current time instead of the clock
        #[arg(long)]
        now: Option<NaiveDateTime>,

        /// Write the records snapshot after rebuilding
        #[arg(long)]
        save: bool,
    },

    /// Print records held in the snapshot
    Show {
        #[arg(long)]
        scope: Option<Scope>,
    },

    /// Overwrite one record by hand and save the snapshot
    Edit {
        scope: Scope,
        /// Metric name, e.g. highTemp
        metric: String,
        value: f64,
        /// When it happened, e.g. 2024-07-19T15:42:00
        timestamp: NaiveDateTime,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Monthly interval logs
    Logs,
    /// Day summary table
    Db,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
        }
    }
}
