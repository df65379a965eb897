//! ratewatch - prime rate change notifier
//!
//! This library exposes each stage of a check (configuration, page fetch,
//! rate extraction, notification) and the `RateCheck` that runs them in order.

pub mod check;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod notify;

pub use check::{CheckOutcome, RateCheck};
pub use config::Configuration;
pub use error::RunError;
