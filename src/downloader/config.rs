//! Configuration structures and defaults for the downloader.
//!
//! ```rust
//! use fetchpool::downloader::DownloadCallback;
//! use fetchpool::download::{Status, Summary};
//!
//! let callback: DownloadCallback = Box::new(|summary: &Summary| match summary.status() {
//!     Status::Success => println!("✓ {}", summary.url()),
//!     Status::Fail(msg) => println!("✗ {} - {}", summary.url(), msg),
//!     Status::HashMismatch(msg) => println!("⚠ {} - {}", summary.url(), msg),
//! });
//! ```

use crate::download::Summary;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::StyleOptions;

use std::sync::Arc;

/// Callback type for download completion events
pub type DownloadCallback = Box<dyn Fn(&Summary) + Send + Sync>;

/// Number of workers started by default.
pub const DEFAULT_WORKERS: usize = 4;
/// Number of tasks that can wait in the queue before submission blocks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;
/// Suffix of the temporary sibling a download is streamed into.
pub const DEFAULT_TEMP_SUFFIX: &str = ".down";
/// Prefix of the directories created by `download_to_temp`.
pub const DEFAULT_TEMP_PREFIX: &str = "fetchpool";

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Number of worker tasks.
    pub workers: usize,
    /// Capacity of the task queue.
    pub queue_capacity: usize,
    /// Suffix appended to the destination while the body is streamed.
    pub temp_suffix: String,
    /// Prefix of the temporary directories used for ephemeral downloads.
    pub temp_prefix: String,
    /// HTTP client options.
    pub http: HttpClientConfig,
    /// Downloader style options.
    pub style_options: StyleOptions,
    /// Callback for when each task completes.
    pub on_complete: Option<Arc<DownloadCallback>>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("workers", &self.workers)
            .field("queue_capacity", &self.queue_capacity)
            .field("temp_suffix", &self.temp_suffix)
            .field("temp_prefix", &self.temp_prefix)
            .field("http", &self.http)
            .field("style_options", &self.style_options)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            temp_suffix: DEFAULT_TEMP_SUFFIX.into(),
            temp_prefix: DEFAULT_TEMP_PREFIX.into(),
            http: HttpClientConfig::default(),
            style_options: StyleOptions::default(),
            on_complete: None,
        }
    }
}

impl DownloaderConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("at least one worker is required".into()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "queue capacity must be greater than zero".into(),
            ));
        }
        // An empty suffix would stream straight into the destination.
        if self.temp_suffix.is_empty() {
            return Err(Error::InvalidConfig("temporary suffix cannot be empty".into()));
        }
        if self.temp_suffix.contains(std::path::is_separator) {
            return Err(Error::InvalidConfig(format!(
                "temporary suffix {:?} cannot contain a path separator",
                self.temp_suffix
            )));
        }
        Ok(())
    }
}
