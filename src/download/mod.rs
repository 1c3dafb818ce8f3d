//! Download module containing the task description and the per-task protocol.
//!
//! - [`task`] - The [`Task`] handed to the workers and its result channel
//! - [`fetch`] - The fetch, verify and commit protocol executed by a worker
//! - [`summary`] - Outcome reporting for the `on_complete` callback
//!
//! # Examples
//!
//! ```rust
//! use fetchpool::checksum::ChecksumInfo;
//! use fetchpool::download::{result_channel, Task};
//! use reqwest::Url;
//!
//! let (tx, _rx) = result_channel();
//! let url = Url::parse("http://deb.example.org/dists/stable/Release")?;
//! let task = Task::new(url, "mirror/dists/stable/Release", tx)
//!     .with_checksum(ChecksumInfo::with_size(1024));
//! assert!(task.expected().verification_requested());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod fetch;
pub mod summary;
pub mod task;

pub use fetch::temp_path;
pub use summary::{Status, Summary};
pub use task::{result_channel, ResultReceiver, ResultSender, Task};
