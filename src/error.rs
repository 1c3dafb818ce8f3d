//! Error handling for fetchpool.
//!
//! Every task ends with exactly one outcome, and a failed outcome is one of
//! the variants below. None of them is retried by the engine; deciding
//! whether to try again belongs to the caller.

use crate::checksum::ChecksumField;
use crate::compression::Compression;

use reqwest::{StatusCode, Url};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen when using fetchpool.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// Used when a worker disappears without reporting the outcome of a task.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The provided URL cannot be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The downloader was configured with values it cannot run with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request could not be sent or the response body could not be read.
    #[error("Transport error while fetching {url}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest_middleware::Error,
    },

    /// The server answered with a status outside of 200-299.
    #[error("HTTP code {} while fetching {url}", .status.as_u16())]
    HttpStatus { status: StatusCode, url: Url },

    /// Creating a directory, writing the temporary file or committing it failed.
    #[error("Filesystem error on {}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The downloaded content does not match the expected checksum.
    #[error("Checksum mismatch for {url}: {field} {actual:?} != {expected:?}")]
    Verification {
        url: Url,
        field: ChecksumField,
        expected: String,
        actual: String,
    },

    /// The fetched file does not start with the header its decoder expects.
    #[error("Decode error: {url} is not a valid {compression} stream")]
    Decode { url: Url, compression: Compression },

    /// The downloader has been shut down and no longer accepts tasks.
    #[error("Downloader is shut down")]
    Stopped,

    /// The HTTP client could not be constructed.
    #[error("HTTP client error")]
    Client {
        #[from]
        source: reqwest::Error,
    },
}

impl Error {
    /// Return the checksum field that failed verification, if any.
    pub fn mismatched_field(&self) -> Option<ChecksumField> {
        match self {
            Error::Verification { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Result type alias for operations that can fail with a fetchpool error.
pub type Result<T> = std::result::Result<T, Error>;
