//! Top-level error type and exit codes

use thiserror::Error;

use crate::config::ConfigError;
use crate::extract::ExtractError;
use crate::fetch::FetchError;
use crate::notify::NotifyError;

/// Exit code for configuration errors (nothing was fetched)
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for fetch failures
pub const EXIT_FETCH: u8 = 3;
/// Exit code when the page did not yield a rate
pub const EXIT_RATE_UNAVAILABLE: u8 = 4;
/// Exit code when the notice could not be sent
pub const EXIT_NOTIFY: u8 = 5;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl RunError {
    /// Process exit code for this failure; always nonzero
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(_) => EXIT_CONFIG,
            RunError::Fetch(_) => EXIT_FETCH,
            RunError::Extract(_) => EXIT_RATE_UNAVAILABLE,
            RunError::Notify(_) => EXIT_NOTIFY,
        }
    }
}
