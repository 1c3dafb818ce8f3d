//! Download summary reported to the `on_complete` callback.
//!
//! ```rust
//! use fetchpool::download::{Status, Summary};
//! use reqwest::Url;
//!
//! let url = Url::parse("http://deb.example.org/dists/stable/Release")?;
//! let summary = Summary::new(url, "mirror/Release", 2048).with_status(Status::Success);
//! assert_eq!(summary.size(), 2048);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::Error;

use reqwest::Url;
use std::path::{Path, PathBuf};

/// Download status enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Download failed with error message
    Fail(String),
    /// Download completed and was committed
    Success,
    /// Download completed but checksum verification failed
    HashMismatch(String),
}

/// Represents the result of one task.
#[derive(Debug, Clone)]
pub struct Summary {
    url: Url,
    destination: PathBuf,
    /// Bytes received.
    size: u64,
    status: Status,
}

impl Summary {
    /// Create a new [`Summary`], initially failed with no message.
    pub fn new(url: Url, destination: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            url,
            destination: destination.into(),
            size,
            status: Status::Fail(String::new()),
        }
    }

    /// Build the summary matching a task outcome.
    pub(crate) fn from_outcome(
        url: Url,
        destination: &Path,
        size: u64,
        outcome: &Result<(), Error>,
    ) -> Self {
        let summary = Self::new(url, destination, size);
        match outcome {
            Ok(()) => summary.with_status(Status::Success),
            Err(e @ Error::Verification { .. }) => summary.hash_mismatch(e),
            Err(e) => summary.fail(e),
        }
    }

    /// Attach a status to a [`Summary`].
    pub fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Get the summary's size.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get a reference to the summary's status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Mark the summary as failed with a message.
    pub fn fail(self, msg: impl std::fmt::Display) -> Self {
        Self {
            status: Status::Fail(msg.to_string()),
            ..self
        }
    }

    /// Mark the summary as having a checksum mismatch with a message.
    pub fn hash_mismatch(self, msg: impl std::fmt::Display) -> Self {
        Self {
            status: Status::HashMismatch(msg.to_string()),
            ..self
        }
    }
}
