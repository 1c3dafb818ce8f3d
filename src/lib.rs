//! Fetchpool fetches files over HTTP(S) with a bounded pool of workers,
//! verifies them against expected checksums and commits them atomically.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fetchpool::{result_channel, ChecksumInfo, DownloaderBuilder, Error};
//! use reqwest::Url;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().workers(4).build()?;
//!
//! let (tx, rx) = result_channel();
//! let url = Url::parse("http://deb.example.org/dists/stable/Release")?;
//! let expected = ChecksumInfo::with_size(2048).sha256("1f2d...");
//! downloader
//!     .download_with_checksum(url, "mirror/dists/stable/Release", tx, expected)
//!     .await;
//!
//! match rx.await? {
//!     Ok(()) => println!("committed"),
//!     Err(Error::Verification { field, .. }) => eprintln!("{} mismatch", field),
//!     Err(e) => eprintln!("{}", e),
//! }
//! downloader.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`downloader`] - The worker pool: [`Downloader`] and [`DownloaderBuilder`]
//! - [`download`] - Tasks and the fetch, verify and commit protocol
//! - [`checksum`] - Expected and computed checksums
//! - [`temp`] - Downloads into a throwaway directory
//! - [`compression`] - Probing `.bz2`, `.gz` and raw variants of a URL
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client construction
//! - [`progress`] - Progress bar styling and display management

pub mod checksum;
pub mod compression;
pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod progress;
pub mod temp;

pub use checksum::{ChecksumField, ChecksumInfo, ChecksumWriter, Mismatch, SKIP_VERIFICATION};
pub use compression::{Compression, Decompressed};
pub use download::{result_channel, Status, Summary, Task};
pub use downloader::{Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
pub use progress::{ProgressBarOpts, StyleOptions};
pub use temp::TempDownload;
