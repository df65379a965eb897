//! Rate extraction from the fetched page
//!
//! The page is scanned line by line for the marker line. Every numeric
//! looking token on that line is collected, the known leading heading token
//! is dropped, and the next token is the published rate.

use regex::Regex;
use std::io::BufRead;
use thiserror::Error;

use crate::constants::{LEADING_TOKENS_SKIPPED, RATE_MARKER, RATE_PATTERN};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Rate unavailable: no line containing the rate marker was found")]
    MarkerNotFound,
    #[error("Rate unavailable: marker line has {found} numeric token(s), need at least {needed}")]
    InsufficientTokens { found: usize, needed: usize },
    #[error("Failed to read page body: {0}")]
    Read(#[from] std::io::Error),
}

/// Return the first line containing `marker`, without its line terminator.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// stray encoding elsewhere on the page does not abort the scan.
pub fn find_marker_line<R: BufRead>(mut reader: R, marker: &str) -> Result<Option<String>, ExtractError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.contains(marker) {
            return Ok(Some(line.to_string()));
        }
    }
}

/// Parse every match of `pattern` in `line`. Matches that do not parse as
/// `f32` are skipped.
pub fn rate_tokens(pattern: &Regex, line: &str) -> Vec<f32> {
    pattern
        .find_iter(line)
        .filter_map(|m| m.as_str().parse::<f32>().ok())
        .collect()
}

/// Drop `skip` leading tokens and return the one that follows.
pub fn select_rate(tokens: &[f32], skip: usize) -> Result<f32, ExtractError> {
    tokens
        .get(skip)
        .copied()
        .ok_or(ExtractError::InsufficientTokens {
            found: tokens.len(),
            needed: skip + 1,
        })
}

/// Locates and parses the published rate in a page body
#[derive(Debug, Clone)]
pub struct RateExtractor {
    marker: String,
    pattern: Regex,
    skip_leading: usize,
}

impl RateExtractor {
    pub fn new(marker: impl Into<String>, skip_leading: usize) -> Self {
        RateExtractor {
            marker: marker.into(),
            pattern: rate_regex(),
            skip_leading,
        }
    }

    pub fn extract<R: BufRead>(&self, reader: R) -> Result<f32, ExtractError> {
        let line = find_marker_line(reader, &self.marker)?.ok_or(ExtractError::MarkerNotFound)?;
        log::debug!("Marker line: {}", line.trim());

        let tokens = rate_tokens(&self.pattern, &line);
        log::debug!("Numeric tokens on marker line: {:?}", tokens);

        select_rate(&tokens, self.skip_leading)
    }
}

impl Default for RateExtractor {
    fn default() -> Self {
        Self::new(RATE_MARKER, LEADING_TOKENS_SKIPPED)
    }
}

fn rate_regex() -> Regex {
    Regex::new(RATE_PATTERN).expect("RATE_PATTERN is a valid regex")
}
