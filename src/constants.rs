//! Global constants for ratewatch
//!
//! Centralized location for the page contract and notification text

/// Substring identifying the table cell that carries the published rate
pub const RATE_MARKER: &str =
    "td-copy-black td-margin-top-small td-margin-bottom-small td-copy-align-centre";

/// Floating point looking tokens on the marker line
pub const RATE_PATTERN: &str = r"[-+]?[0-9]*\.?[0-9]+";

/// Leading tokens on the marker line that precede the rate (the `<h2>` heading)
pub const LEADING_TOKENS_SKIPPED: usize = 1;

/// Subject line of the change notification
pub const NOTICE_SUBJECT: &str = "IMPORTANT PRIME RATE CHANGES";

/// User agent sent with the page request
pub const USER_AGENT: &str = concat!("ratewatch/", env!("CARGO_PKG_VERSION"));

/// SMTP port that expects TLS from the first byte instead of STARTTLS
pub const SMTPS_PORT: u16 = 465;
