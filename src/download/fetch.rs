//! Fetch, verify and commit a single task.
//!
//! The body is streamed into `destination + suffix`. When the task carries a
//! checksum, every chunk written to that temporary file is also fed to a
//! [`ChecksumWriter`]. The temporary file is renamed onto the destination
//! only after verification passed, and it is removed on every failure path,
//! so the destination either keeps its previous state or holds the complete,
//! verified content.

use super::{Summary, Task};
use crate::checksum::ChecksumWriter;
use crate::downloader::DownloadCallback;
use crate::error::{Error, Result};
use crate::progress::ProgressDisplay;

use futures::StreamExt;
use reqwest::{Response, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

/// Path of the temporary sibling used while `destination` is being fetched.
pub fn temp_path(destination: &Path, suffix: &str) -> PathBuf {
    let mut path = destination.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Writes every chunk to the temporary file and, when present, to the checksum sink.
pub(crate) struct FanOutWriter<'a> {
    file: fs::File,
    sink: Option<&'a mut ChecksumWriter>,
}

impl<'a> FanOutWriter<'a> {
    pub(crate) fn new(file: fs::File, sink: Option<&'a mut ChecksumWriter>) -> Self {
        Self { file, sink }
    }

    pub(crate) async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf).await?;
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.write_all(buf)?;
        }
        Ok(())
    }

    pub(crate) async fn flush(&mut self) -> io::Result<()> {
        self.file.flush().await?;
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

/// Runs the protocol for the workers of one downloader.
pub(crate) struct Fetcher {
    client: ClientWithMiddleware,
    temp_suffix: String,
    progress: Arc<ProgressDisplay>,
    on_complete: Option<Arc<DownloadCallback>>,
}

impl Fetcher {
    pub(crate) fn new(
        client: ClientWithMiddleware,
        temp_suffix: String,
        progress: Arc<ProgressDisplay>,
        on_complete: Option<Arc<DownloadCallback>>,
    ) -> Self {
        Self {
            client,
            temp_suffix,
            progress,
            on_complete,
        }
    }

    /// Process a task and report its outcome.
    pub(crate) async fn handle(&self, task: Task) {
        info!(url = %task.url(), "Downloading");

        let (size, outcome) = match self.fetch(&task).await {
            Ok(size) => (size, Ok(())),
            Err(e) => {
                warn!(url = %task.url(), error = %e, "Download failed");
                (0, Err(e))
            }
        };

        self.progress.increment_main();
        if let Some(ref callback) = self.on_complete {
            callback(&Summary::from_outcome(
                task.url().clone(),
                task.destination(),
                size,
                &outcome,
            ));
        }

        task.finish(outcome);
    }

    /// Fetches the file, verifies it when requested and commits it to the destination.
    async fn fetch(&self, task: &Task) -> Result<u64> {
        let url = task.url();

        debug!("Fetching {}", url);
        let res = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status,
                url: url.clone(),
            });
        }

        let destination = task.destination();
        if let Some(dir) = destination
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            debug!("Creating destination directory {:?}", dir);
            fs::create_dir_all(dir)
                .await
                .map_err(|source| Error::Filesystem {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let temp = temp_path(destination, &self.temp_suffix);
        debug!("Creating temporary file {:?}", temp);
        let file = fs::File::create(&temp)
            .await
            .map_err(|source| Error::Filesystem {
                path: temp.clone(),
                source,
            })?;

        // The sink is skipped entirely when nothing is going to be verified.
        let mut sink = task
            .expected()
            .verification_requested()
            .then(ChecksumWriter::new);

        let written = match self
            .stream_body(res, url, &temp, FanOutWriter::new(file, sink.as_mut()))
            .await
        {
            Ok(written) => written,
            Err(e) => {
                discard(&temp).await;
                return Err(e);
            }
        };

        if let Some(sink) = sink {
            if let Some(mismatch) = task.expected().mismatch(&sink.sum()) {
                discard(&temp).await;
                return Err(Error::Verification {
                    url: url.clone(),
                    field: mismatch.field,
                    expected: mismatch.expected,
                    actual: mismatch.actual,
                });
            }
        }

        debug!("Committing {:?} to {:?}", temp, destination);
        if let Err(source) = fs::rename(&temp, destination).await {
            discard(&temp).await;
            return Err(Error::Filesystem {
                path: destination.to_path_buf(),
                source,
            });
        }

        Ok(written)
    }

    /// Copy the response body chunk by chunk.
    async fn stream_body(
        &self,
        res: Response,
        url: &Url,
        temp: &Path,
        mut out: FanOutWriter<'_>,
    ) -> Result<u64> {
        let pb = self
            .progress
            .create_child_progress(res.content_length().unwrap_or(0));

        let copied: Result<u64> = async {
            let mut written = 0;
            let mut stream = res.bytes_stream();
            while let Some(item) = stream.next().await {
                let chunk = item.map_err(|e| Error::Transport {
                    url: url.clone(),
                    source: e.into(),
                })?;
                out.write_all(&chunk)
                    .await
                    .map_err(|source| Error::Filesystem {
                        path: temp.to_path_buf(),
                        source,
                    })?;
                written += chunk.len() as u64;
                pb.inc(chunk.len() as u64);
            }
            out.flush().await.map_err(|source| Error::Filesystem {
                path: temp.to_path_buf(),
                source,
            })?;
            Ok(written)
        }
        .await;

        self.progress.finish_child(pb);
        copied
    }
}

async fn discard(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        debug!("Failed to remove temporary file {:?}: {}", temp, e);
    }
}
