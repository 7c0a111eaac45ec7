//! Runtime configuration
//!
//! Assembled from parsed CLI arguments, which already carry the
//! `QUOTD_*` environment fallbacks, plus built-in defaults.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::cli::Cli;
use crate::quote::DEFAULT_API_BASE;
use crate::scheduler::DEFAULT_POLL_INTERVAL;
use crate::storage::FileStore;

/// Name of the log file written in watch mode
pub const LOG_FILE_NAME: &str = "quotd.log";

/// Longest poll that still lands a tick inside the 00:00 minute
pub const MAX_POLL_SECS: u64 = 60;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Poll interval must be at least one second")]
    InvalidPollInterval,

    #[error("Poll interval of {0}s is too long; midnight is only detected with a poll of at most 60s")]
    PollIntervalTooLong(u64),

    #[error("Could not determine a data directory; pass --data-dir or set QUOTD_DATA_DIR")]
    NoDataDir,
}

/// Application configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Quotes API base URL
    pub api_base: String,
    /// Explicit data directory, or `None` for the XDG default
    pub data_dir: Option<PathBuf>,
    /// Time between rollover checks
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Config {
    /// Resolves configuration from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let poll_interval = match cli.poll_secs {
            Some(0) => return Err(ConfigError::InvalidPollInterval),
            Some(secs) if secs > MAX_POLL_SECS => {
                return Err(ConfigError::PollIntervalTooLong(secs))
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.poll_interval,
        };

        Ok(Self {
            api_base: cli.api_base.clone().unwrap_or(defaults.api_base),
            data_dir: cli.data_dir.clone(),
            poll_interval,
        })
    }

    /// Opens the persistent store for the quote cache
    pub fn open_store(&self) -> Result<FileStore, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(FileStore::with_dir(dir.clone())),
            None => FileStore::new().ok_or(ConfigError::NoDataDir),
        }
    }

    /// Path of the watch-mode log file
    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.open_store()?.dir().join(LOG_FILE_NAME))
    }
}
