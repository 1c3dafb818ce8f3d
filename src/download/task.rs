//! A single fetch request and the channel its outcome is reported on.

use crate::checksum::ChecksumInfo;
use crate::error::Result;

use reqwest::Url;
use std::path::{Path, PathBuf};
use tokio::sync::oneshot;
use tracing::debug;

/// Sending half of a task's result channel.
pub type ResultSender = oneshot::Sender<Result<()>>;

/// Receiving half of a task's result channel.
pub type ResultReceiver = oneshot::Receiver<Result<()>>;

/// Create a result channel for one task.
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    oneshot::channel()
}

/// Represents one file to fetch.
///
/// A task is consumed by exactly one worker and reports exactly one outcome.
#[derive(Debug)]
pub struct Task {
    url: Url,
    destination: PathBuf,
    result: ResultSender,
    expected: ChecksumInfo,
}

impl Task {
    /// Creates a new [`Task`] without verification.
    pub fn new(url: Url, destination: impl Into<PathBuf>, result: ResultSender) -> Self {
        Self {
            url,
            destination: destination.into(),
            result,
            expected: ChecksumInfo::skip(),
        }
    }

    /// Attach the checksum the fetched content must match.
    pub fn with_checksum(self, expected: ChecksumInfo) -> Self {
        Self { expected, ..self }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn expected(&self) -> &ChecksumInfo {
        &self.expected
    }

    /// Report the outcome, consuming the task.
    pub(crate) fn finish(self, outcome: Result<()>) {
        if self.result.send(outcome).is_err() {
            debug!(url = %self.url, "result receiver dropped before the outcome arrived");
        }
    }
}
