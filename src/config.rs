//! Configuration file management
//!
//! The configuration is a flat JSON record that doubles as the state file:
//! `expected_rate` is the last rate a notification was sent for. It is read
//! once at startup and rewritten in full only after a confirmed send.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write configuration file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Watcher configuration and persisted baseline rate
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Last rate a notification was sent for
    pub expected_rate: f32,
    /// Page carrying the published rate
    pub url: String,
    /// Sender address, also used as the SMTP username
    pub from: String,
    /// Notification recipients, in order
    pub recipients: Vec<String>,
    /// SMTP server host name
    pub smtp_addr: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP password for `from`
    pub smtp_auth: String,
}

impl Configuration {
    /// Load the configuration from a JSON file. There are no defaults: a
    /// missing file or any malformed field is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rewrite the whole configuration file.
    ///
    /// The new contents go to a temporary file next to the real file (the
    /// symlink target when `path` is a link) which is then renamed over it,
    /// so readers never observe a truncated file. When no temporary file can
    /// be created there, the file is overwritten in place instead.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');

        let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = match tempfile::NamedTempFile::new_in(dir) {
            Ok(tmp) => tmp,
            Err(e) => {
                log::warn!(
                    "Cannot create a temporary file in {} ({}); overwriting {} in place",
                    dir.display(),
                    e,
                    target.display()
                );
                return fs::write(&target, contents).map_err(write_err);
            }
        };
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        // Keep the mode of the file being replaced
        if let Ok(metadata) = fs::metadata(&target) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_err)?;
        }

        tmp.persist(&target).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    /// `host:port` of the SMTP server
    pub fn smtp_endpoint(&self) -> String {
        format!("{}:{}", self.smtp_addr, self.smtp_port)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("expected_rate", &self.expected_rate)
            .field("url", &self.url)
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .field("smtp_addr", &self.smtp_addr)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_auth", &"<redacted>")
            .finish()
    }
}
