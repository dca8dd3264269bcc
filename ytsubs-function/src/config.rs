//! Command line configuration

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use ytsubs_lib::FetchConfig;

/// Log output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Caption download gateway function.
///
/// Reads one gateway event as JSON and prints one gateway response as JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "ytsubs-function")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Read the event from this file instead of stdin.
    #[arg(short = 'e', long)]
    pub event: Option<PathBuf>,

    /// Watch page timeout in seconds.
    #[arg(long, env = "PAGE_TIMEOUT_SECS", default_value_t = 30)]
    pub page_timeout_secs: u64,

    /// Timed-text timeout in seconds.
    #[arg(long, env = "TRACK_TIMEOUT_SECS", default_value_t = 20)]
    pub track_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format. Logs always go to stderr.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.page_timeout_secs == 0 || self.track_timeout_secs == 0 {
            return Err("Timeouts must be at least one second".to_string());
        }
        Ok(())
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            track_timeout: Duration::from_secs(self.track_timeout_secs),
            ..FetchConfig::default()
        }
    }
}
