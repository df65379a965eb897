//! Page fetching
//!
//! A single blocking GET per run. The body is handed back as an owned reader;
//! dropping it releases the connection, on success and error paths alike.

use std::io::Read;
use std::time::Duration;
use thiserror::Error;

use crate::constants::USER_AGENT;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("Request to {url} returned HTTP {code}")]
    Status { url: String, code: u16 },
}

/// Source of the page that carries the rate
pub trait PageSource {
    /// Open the page body for reading
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, FetchError>;
}

/// Fetches pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    agent: ureq::Agent,
}

impl HttpPageSource {
    /// Create a fetcher. `None` keeps the request unbounded in time.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        HttpPageSource {
            agent: builder.build(),
        }
    }
}

impl Default for HttpPageSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PageSource for HttpPageSource {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, FetchError> {
        log::info!("Fetching {}", url);

        match self.agent.get(url).call() {
            Ok(resp) => {
                log::debug!(
                    "{} answered {} {} ({})",
                    url,
                    resp.status(),
                    resp.status_text(),
                    resp.content_type()
                );
                Ok(Box::new(resp.into_reader()))
            }
            Err(ureq::Error::Status(code, _)) => Err(FetchError::Status {
                url: url.to_string(),
                code,
            }),
            Err(e) => Err(FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
