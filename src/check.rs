//! The rate check: fetch, extract, compare, notify, persist
//!
//! The persisted `expected_rate` only ever moves after the mailer reports a
//! successful send. Any failure before that leaves the file untouched, so the
//! next scheduled run notices the same change and tries again.

use std::io::BufReader;
use std::path::PathBuf;

use crate::config::Configuration;
use crate::error::RunError;
use crate::extract::RateExtractor;
use crate::fetch::PageSource;
use crate::notify::{Mailer, RateNotice};

/// Result of one completed check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Published rate matches the stored one; nothing was sent or written
    Unchanged { rate: f32 },
    /// Notice sent and the new rate persisted
    Notified { previous: f32, current: f32 },
    /// Change detected but sending and persisting were skipped
    DryRun { previous: f32, current: f32, notice: RateNotice },
}

/// Whether `current` counts as the same rate as `expected`.
///
/// A tolerance of zero is exact `f32` equality.
pub fn rates_match(current: f32, expected: f32, tolerance: f32) -> bool {
    if tolerance > 0.0 {
        (current - expected).abs() <= tolerance
    } else {
        current == expected
    }
}

/// One run of the watcher against a loaded configuration
pub struct RateCheck<'a, P: PageSource, M: Mailer> {
    config_path: PathBuf,
    config: Configuration,
    pages: &'a P,
    mailer: &'a M,
    extractor: RateExtractor,
    tolerance: f32,
    dry_run: bool,
}

impl<'a, P: PageSource, M: Mailer> RateCheck<'a, P, M> {
    /// `config` must have been loaded from `config_path`; it is written back
    /// there when a notice goes out.
    pub fn new(
        config_path: impl Into<PathBuf>,
        config: Configuration,
        pages: &'a P,
        mailer: &'a M,
    ) -> Self {
        RateCheck {
            config_path: config_path.into(),
            config,
            pages,
            mailer,
            extractor: RateExtractor::default(),
            tolerance: 0.0,
            dry_run: false,
        }
    }

    pub fn with_extractor(mut self, extractor: RateExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(self) -> Result<CheckOutcome, RunError> {
        let RateCheck {
            config_path,
            mut config,
            pages,
            mailer,
            extractor,
            tolerance,
            dry_run,
        } = self;

        let current = fetch_rate(pages, &extractor, &config.url)?;
        let previous = config.expected_rate;
        log::info!("Published rate is {}", current);

        if rates_match(current, previous, tolerance) {
            log::info!("Rate unchanged at {}", previous);
            return Ok(CheckOutcome::Unchanged { rate: previous });
        }

        log::info!("Rate changed from {} to {}", previous, current);
        let notice = RateNotice::new(&config, previous, current);
        log::debug!("Composed notice:\n{}", notice);

        if dry_run {
            log::info!("Dry run: not sending notice or updating {}", config_path.display());
            return Ok(CheckOutcome::DryRun {
                previous,
                current,
                notice,
            });
        }

        mailer.send(&notice)?;
        log::info!("Notice sent to {}", notice.to_header());

        config.expected_rate = current;
        config.save(&config_path)?;
        log::info!("Stored expected rate {} in {}", current, config_path.display());

        Ok(CheckOutcome::Notified { previous, current })
    }
}

/// Fetch the page and extract the rate. The body is released when this
/// returns, whatever the result.
fn fetch_rate<P: PageSource>(pages: &P, extractor: &RateExtractor, url: &str) -> Result<f32, RunError> {
    let body = pages.open(url)?;
    let rate = extractor.extract(BufReader::new(body))?;
    Ok(rate)
}
