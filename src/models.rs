//! Data models module
//!
//! Defines the options a single invocation runs with

use std::path::PathBuf;
use std::time::Duration;

/// How much the run logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    /// Progress of each stage
    #[default]
    Normal,
    /// Marker line, tokens and the composed message
    Verbose,
}

/// Options for one run of the watcher
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Configuration file, also the state file for the expected rate
    pub config_path: PathBuf,
    /// Report a change without sending or persisting it
    pub dry_run: bool,
    /// Largest difference still treated as unchanged (0 = exact)
    pub tolerance: f32,
    /// Bound on the HTTP request and SMTP session
    pub timeout: Option<Duration>,
    /// Log verbosity
    pub verbosity: Verbosity,
}
