//! Command line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use signals_lib::RetryConfig;

/// Brand monitoring dashboard.
#[derive(Debug, Parser)]
#[command(name = "signals", version, about)]
pub struct Args {
    /// Brand list (JSON array). Defaults to `brands.json` in the data
    /// directory, then to a built-in sample.
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Column key to sort by.
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Show row select markers.
    #[arg(long)]
    pub selectable: bool,

    /// Navigate the table with the keyboard.
    #[arg(short, long)]
    pub interactive: bool,

    /// Maximum load attempts.
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub initial_delay_ms: u64,

    /// Fail the first N loads with a simulated outage.
    #[arg(long, default_value_t = 0)]
    pub fail_first: u32,

    /// Log level for the log file.
    #[arg(long, default_value = "debug")]
    pub log_level: LevelFilter,
}

impl Args {
    /// Retry configuration for loading data.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default()
            .max_retries(self.max_retries)
            .initial_delay(Duration::from_millis(self.initial_delay_ms))
    }
}
