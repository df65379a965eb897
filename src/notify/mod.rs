//! Change notification
//!
//! Handles:
//! - Composing the plaintext rate change notice
//! - The `Mailer` seam between the check and the delivery transport
//! - SMTP delivery (see `smtp`)

use std::fmt;
use thiserror::Error;

use crate::config::Configuration;
use crate::constants::NOTICE_SUBJECT;

pub mod smtp;

pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("Failed to build email: {0}")]
    Message(String),
    #[error("Failed to send email via {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },
}

/// Delivers a composed notice
pub trait Mailer {
    fn send(&self, notice: &RateNotice) -> Result<(), NotifyError>;
}

/// Plaintext notice announcing a new rate
#[derive(Debug, Clone, PartialEq)]
pub struct RateNotice {
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub rate: f32,
}

impl RateNotice {
    pub fn new(config: &Configuration, previous: f32, rate: f32) -> Self {
        let direction = if rate < previous { "down" } else { "up" };
        RateNotice {
            from: config.from.clone(),
            recipients: config.recipients.clone(),
            subject: NOTICE_SUBJECT.to_string(),
            body: format!("Prime rate today has gone {} to {:.2}\n", direction, rate),
            rate,
        }
    }

    /// Comma separated `To` header value
    pub fn to_header(&self) -> String {
        self.recipients.join(",")
    }
}

impl fmt::Display for RateNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "From: {}\nTo: {}\nSubject: {}\n\n{}",
            self.from,
            self.to_header(),
            self.subject,
            self.body
        )
    }
}
