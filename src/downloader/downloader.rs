//! Core downloader implementation.
//!
//! The [`Downloader`] owns a bounded task queue and a fixed set of workers.
//! Submitting waits while the queue is full, and every task reports exactly
//! one outcome on its result channel.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchpool::checksum::ChecksumInfo;
//! use fetchpool::download::result_channel;
//! use fetchpool::downloader::DownloaderBuilder;
//! use reqwest::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().workers(8).build()?;
//!
//! let (tx, rx) = result_channel();
//! let url = Url::parse("http://deb.example.org/dists/stable/Release")?;
//! downloader
//!     .download_with_checksum(url, "mirror/dists/stable/Release", tx, ChecksumInfo::with_size(2048))
//!     .await;
//! rx.await??;
//!
//! downloader.shutdown().await;
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use super::worker::{Control, Worker};
use crate::checksum::ChecksumInfo;
use crate::download::fetch::Fetcher;
use crate::download::{ResultSender, Task};
use crate::error::{Error, Result};
use crate::http::create_http_client;
use crate::progress::ProgressDisplay;

use reqwest::Url;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::debug;

/// Represents the download controller.
///
/// A downloader is created via its builder and is cheap to clone; all clones
/// drive the same queue and workers.
///
/// ```rust
/// # #[tokio::main]
/// # async fn main() -> Result<(), fetchpool::Error> {
/// use fetchpool::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::hidden().workers(2).build()?;
/// d.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    shared: Arc<Shared>,
}

struct Shared {
    config: DownloaderConfig,
    queue: mpsc::Sender<Task>,
    workers: Vec<mpsc::Sender<Control>>,
    progress: Arc<ProgressDisplay>,
    stopped: AtomicBool,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.shared.config)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl Downloader {
    /// Creates the downloader and starts its workers.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn new(config: DownloaderConfig) -> Result<Self> {
        config.validate()?;

        let client = create_http_client(config.http.clone())?;
        let progress = Arc::new(ProgressDisplay::new(config.style_options.clone()));
        let fetcher = Arc::new(Fetcher::new(
            client,
            config.temp_suffix.clone(),
            progress.clone(),
            config.on_complete.clone(),
        ));

        let (queue, receiver) = mpsc::channel(config.queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..config.workers)
            .map(|id| {
                let (control, commands) = mpsc::channel(1);
                Worker::new(id, receiver.clone(), commands, fetcher.clone()).spawn();
                control
            })
            .collect();

        debug!("Started {} workers", config.workers);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                queue,
                workers,
                progress,
                stopped: AtomicBool::new(false),
            }),
        })
    }

    /// Gets the number of workers.
    pub fn workers(&self) -> usize {
        self.shared.config.workers
    }

    /// Gets the capacity of the task queue.
    pub fn queue_capacity(&self) -> usize {
        self.shared.config.queue_capacity
    }

    /// Gets the suffix of the temporary files.
    pub fn temp_suffix(&self) -> &str {
        &self.shared.config.temp_suffix
    }

    pub(crate) fn temp_prefix(&self) -> &str {
        &self.shared.config.temp_prefix
    }

    /// Gets the full configuration.
    pub fn config(&self) -> &DownloaderConfig {
        &self.shared.config
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
    }

    /// Number of finished and submitted tasks.
    pub fn progress(&self) -> (u64, u64) {
        self.shared.progress.counts()
    }

    /// Queue a task, waiting while the queue is full.
    ///
    /// After shutdown the task is refused and its result channel receives
    /// [`Error::Stopped`].
    pub async fn submit(&self, task: Task) {
        if self.is_stopped() {
            task.finish(Err(Error::Stopped));
            return;
        }

        match self.shared.queue.send(task).await {
            Ok(()) => self.shared.progress.task_queued(),
            Err(mpsc::error::SendError(task)) => task.finish(Err(Error::Stopped)),
        }
    }

    /// Queue a task which must match `expected` before being committed.
    pub async fn submit_with_checksum(&self, task: Task, expected: ChecksumInfo) {
        self.submit(task.with_checksum(expected)).await
    }

    /// Fetch `url` into `destination` without verification.
    pub async fn download(
        &self,
        url: Url,
        destination: impl Into<PathBuf>,
        result: ResultSender,
    ) {
        self.submit(Task::new(url, destination, result)).await
    }

    /// Fetch `url` into `destination`, verifying it against `expected`.
    pub async fn download_with_checksum(
        &self,
        url: Url,
        destination: impl Into<PathBuf>,
        result: ResultSender,
        expected: ChecksumInfo,
    ) {
        self.submit_with_checksum(Task::new(url, destination, result), expected)
            .await
    }

    /// Stop starting new tasks.
    ///
    /// Returns once every worker has finished its current task and is idle.
    pub async fn pause(&self) {
        debug!("Pausing workers");
        self.broadcast(Control::Pause).await;
    }

    /// Let paused workers pick up tasks again.
    pub async fn resume(&self) {
        debug!("Resuming workers");
        self.broadcast(Control::Resume).await;
    }

    /// Stop every worker once its current task is done.
    ///
    /// Tasks still waiting in the queue are not processed, and later
    /// submissions are refused.
    pub async fn shutdown(&self) {
        debug!("Shutting down workers");
        self.shared.stopped.store(true, Ordering::SeqCst);
        self.broadcast(Control::Stop).await;
        self.shared.progress.finish();
    }

    /// Send one command to every worker and wait for all acknowledgments.
    async fn broadcast(&self, command: fn(oneshot::Sender<()>) -> Control) {
        let mut acks = Vec::with_capacity(self.shared.workers.len());
        for worker in &self.shared.workers {
            let (ack, acked) = oneshot::channel();
            // A closed channel means the worker already stopped.
            if worker.send(command(ack)).await.is_ok() {
                acks.push(acked);
            }
        }

        for acked in acks {
            let _ = acked.await;
        }
    }
}
