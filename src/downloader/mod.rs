//! Downloader module containing the worker pool, its builder and configuration.
//!
//! - `downloader` - The [`Downloader`] handle: submission, pause, resume and shutdown
//! - `worker` - The loop each worker runs
//! - `builder` - [`DownloaderBuilder`] for configuring and starting a downloader
//! - `config` - Configuration structures, defaults and callback types
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchpool::download::result_channel;
//! use fetchpool::downloader::DownloaderBuilder;
//! use reqwest::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().workers(4).build()?;
//!
//! let mut pending = Vec::new();
//! for name in ["Release", "Release.gpg", "InRelease"] {
//!     let (tx, rx) = result_channel();
//!     let url = Url::parse(&format!("http://deb.example.org/dists/stable/{}", name))?;
//!     downloader.download(url, format!("mirror/dists/stable/{}", name), tx).await;
//!     pending.push(rx);
//! }
//!
//! for rx in pending {
//!     rx.await??;
//! }
//! downloader.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
pub(crate) mod worker;

pub use builder::DownloaderBuilder;
pub use config::{
    DownloadCallback, DownloaderConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_TEMP_PREFIX,
    DEFAULT_TEMP_SUFFIX, DEFAULT_WORKERS,
};
pub use downloader::Downloader;
