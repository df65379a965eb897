#![forbid(unsafe_code)]

use std::process::ExitCode;

use ratewatch::check::{CheckOutcome, RateCheck};
use ratewatch::config::Configuration;
use ratewatch::error::{RunError, EXIT_CONFIG};
use ratewatch::fetch::HttpPageSource;
use ratewatch::models::RunOptions;
use ratewatch::notify::SmtpMailer;
use ratewatch::{cli, logging};

fn main() -> ExitCode {
    let options = match cli::parse_args() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(err) = logging::init_logger(options.verbosity) {
        eprintln!("Warning: {}", err);
    }

    match run(&options) {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(options: &RunOptions) -> Result<CheckOutcome, RunError> {
    let config = Configuration::load(&options.config_path)?;
    log::info!(
        "Loaded {} (expected rate {}, {} recipient(s))",
        options.config_path.display(),
        config.expected_rate,
        config.recipients.len()
    );

    let pages = HttpPageSource::new(options.timeout);
    let mailer = SmtpMailer::from_config(&config, options.timeout);

    RateCheck::new(&options.config_path, config, &pages, &mailer)
        .with_tolerance(options.tolerance)
        .dry_run(options.dry_run)
        .run()
}

fn report(outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Unchanged { rate } => {
            log::info!("No change: prime rate is still {:.2}", rate);
        }
        CheckOutcome::Notified { previous, current } => {
            log::info!("Prime rate changed from {:.2} to {:.2}; recipients notified", previous, current);
        }
        CheckOutcome::DryRun { notice, .. } => {
            println!("{}", notice);
        }
    }
}
