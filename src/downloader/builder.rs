//! Builder pattern implementation for creating Downloader instances.
//!
//! ```rust
//! use fetchpool::downloader::DownloaderBuilder;
//! use fetchpool::download::Status;
//! use reqwest::header::{HeaderMap, USER_AGENT};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "mirror/1.0".parse()?);
//!
//! let downloader = DownloaderBuilder::hidden()
//!     .workers(4)
//!     .headers(headers)
//!     .on_complete(|summary| {
//!         if let Status::Fail(msg) = summary.status() {
//!             eprintln!("{}: {}", summary.url(), msg);
//!         }
//!     })
//!     .build()?;
//! downloader.shutdown().await;
//! # Ok(())
//! # }
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::download::Summary;
use crate::error::Result;
use crate::{ProgressBarOpts, StyleOptions};

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::sync::Arc;

/// A builder used to create a [`Downloader`].
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bars.
    pub fn hidden() -> Self {
        DownloaderBuilder::default().style_options(StyleOptions::new(
            ProgressBarOpts::hidden(),
            ProgressBarOpts::hidden(),
        ))
    }

    /// Set the number of workers fetching in parallel.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set how many tasks may wait in the queue before submission blocks.
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.config.queue_capacity = queue_capacity;
        self
    }

    /// Set the suffix of the temporary file a download is streamed into.
    ///
    /// It must not collide with the names of real files next to the destinations.
    pub fn temp_suffix(mut self, temp_suffix: impl Into<String>) -> Self {
        self.config.temp_suffix = temp_suffix.into();
        self
    }

    /// Set the prefix of the directories created for ephemeral downloads.
    pub fn temp_prefix(mut self, temp_prefix: impl Into<String>) -> Self {
        self.config.temp_prefix = temp_prefix.into();
        self
    }

    /// Set the downloader style options.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    /// Route every request through `proxy`.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.http.proxy = Some(proxy);
        self
    }

    /// Ignore the proxies configured in the environment.
    pub fn no_proxy(mut self) -> Self {
        self.config.http.no_proxy = true;
        self
    }

    /// Set callback for when each task completes, successfully or not.
    ///
    /// The callback runs on the worker that processed the task, right before
    /// the outcome is sent on the task's result channel.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Summary) + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.http.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add default HTTP headers sent with every request.
    ///
    /// Calling `.headers()` several times merges all maps into one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.http.headers = Some(new);
        self
    }

    /// Add a single default HTTP header.
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use fetchpool::downloader::DownloaderBuilder;
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .header(header::USER_AGENT, HeaderValue::from_static("mirror/1.0"));
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.http.headers = Some(new);
        self
    }

    /// Get the configuration built so far.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Create the [`Downloader`] and start its workers.
    ///
    /// Must be called from within a tokio runtime. Fails if the
    /// configuration is invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<Downloader> {
        Downloader::new(self.config)
    }
}
