//! Logging setup
//!
//! Every stage logs through the `log` facade; `env_logger` writes it to
//! stderr. `RUST_LOG` takes precedence over the level chosen on the command line.

use anyhow::{anyhow, Result};
use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::models::Verbosity;

/// Level used when `RUST_LOG` is not set
pub fn default_level(verbosity: Verbosity) -> LevelFilter {
    match verbosity {
        Verbosity::Quiet => LevelFilter::Warn,
        Verbosity::Normal => LevelFilter::Info,
        Verbosity::Verbose => LevelFilter::Debug,
    }
}

/// Install the stderr logger
pub fn init_logger(verbosity: Verbosity) -> Result<()> {
    let level = default_level(verbosity).to_string().to_lowercase();
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .format_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to set logger: {}", e))
}
