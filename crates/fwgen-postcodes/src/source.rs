//! Where the postcode CSV comes from.
//!
//! Uses blocking HTTP via `ureq`; the tools have no async runtime.

use crate::PostcodeError;
use std::path::PathBuf;
use std::time::Duration;

/// A provider of raw postcode CSV text.
pub trait PostcodeSource {
    /// Return the full CSV document.
    fn fetch(&self) -> Result<String, PostcodeError>;

    /// Human-readable origin (for display/logging).
    fn describe(&self) -> String;
}

/// Downloads the CSV over HTTP(S).
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::Agent::new_with_config(
                ureq::config::Config::builder()
                    .timeout_global(Some(timeout))
                    .build(),
            ),
        }
    }

    fn fetch_error(&self, message: impl ToString) -> PostcodeError {
        PostcodeError::RemoteFetch {
            url: self.url.clone(),
            message: message.to_string(),
        }
    }
}

impl PostcodeSource for HttpSource {
    fn fetch(&self) -> Result<String, PostcodeError> {
        // Non-2xx statuses come back as ureq::Error::StatusCode.
        let mut response = self
            .agent
            .get(self.url.as_str())
            .call()
            .map_err(|e| self.fetch_error(e))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| self.fetch_error(e))?;
        tracing::debug!("downloaded {} bytes from {}", body.len(), self.url);
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a CSV file from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PostcodeSource for FileSource {
    fn fetch(&self) -> Result<String, PostcodeError> {
        std::fs::read_to_string(&self.path).map_err(|source| PostcodeError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
