//! CLI argument parsing and validation module
//!
//! Handles command-line interface using clap, including:
//! - The configuration file path (`--config`, with `--path` as alias)
//! - Dry run and change tolerance
//! - Network timeout
//! - Verbosity and quiet modes

use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{RunOptions, Verbosity};

/// Build the clap command definition
pub fn build_command() -> Command {
    Command::new("ratewatch")
        .version(env!("RATEWATCH_VERSION"))
        .long_version(concat!(env!("RATEWATCH_VERSION"), " (", env!("GIT_HASH"), ")"))
        .about("Email recipients when the published prime rate changes")
        .long_about(
            "Fetches the configured page, extracts the published prime rate and compares it \
             with the expected rate stored in the configuration file. When the rate changed, \
             a notice is emailed to every recipient and the new rate is written back to the \
             configuration file. Intended to be run periodically by an external scheduler.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .visible_alias("path")
                .value_name("FILE")
                .help("Path to the JSON configuration file")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Report a change without sending email or updating the configuration")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .value_name("EPS")
                .help("Treat rates within EPS of the expected rate as unchanged (0 = exact match)")
                .value_parser(value_parser!(f32))
                .default_value("0"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Give up on the page request or mail server after SECS seconds")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log the marker line, extracted tokens and the composed email")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

/// Parse command line arguments and return run options
pub fn parse_args() -> Result<RunOptions> {
    parse_args_from(std::env::args_os())
}

/// Parse an explicit argument list. Usage errors, `--help` and `--version`
/// are handled by clap and exit the process.
pub fn parse_args_from<I, T>(args: I) -> Result<RunOptions>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().get_matches_from(args);
    options_from_matches(&matches)
}

fn options_from_matches(matches: &ArgMatches) -> Result<RunOptions> {
    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .ok_or_else(|| anyhow!("A configuration file must be provided with --config"))?;

    let tolerance = matches.get_one::<f32>("tolerance").copied().unwrap_or(0.0);
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(anyhow!(
            "Invalid tolerance: {}. Must be a non-negative number",
            tolerance
        ));
    }

    let timeout = matches
        .get_one::<u64>("timeout")
        .map(|secs| Duration::from_secs(*secs));

    let verbosity = if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    Ok(RunOptions {
        config_path,
        dry_run: matches.get_flag("dry-run"),
        tolerance,
        timeout,
        verbosity,
    })
}
