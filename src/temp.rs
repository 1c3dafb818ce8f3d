//! Fetch a URL into a throwaway location.
//!
//! The file lands in a fresh temporary directory. The returned
//! [`TempDownload`] owns both the open file and that directory, and removes
//! the directory when dropped. If the download fails, the directory is
//! removed right away.

use crate::download::result_channel;
use crate::downloader::Downloader;
use crate::error::{Error, Result};

use reqwest::Url;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::fs;
use tracing::debug;

/// Name of the downloaded file inside its temporary directory.
pub const BUFFER_FILENAME: &str = "buffer";

/// A downloaded file whose directory lives as long as the handle.
#[derive(Debug)]
pub struct TempDownload {
    file: File,
    dir: TempDir,
}

impl TempDownload {
    /// Path of the downloaded file. It stops existing once the handle is dropped.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(BUFFER_FILENAME)
    }

    /// Borrow the open file.
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Size of the downloaded file in bytes.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Read for TempDownload {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for TempDownload {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url)
        .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e)))
}

impl Downloader {
    /// Fetch `url` into a temporary file and return it opened for reading.
    ///
    /// The task goes through the regular queue, so this waits for a free
    /// worker like any other submission.
    ///
    /// ```rust,no_run
    /// use std::io::Read;
    /// use fetchpool::downloader::DownloaderBuilder;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let downloader = DownloaderBuilder::new().build()?;
    /// let mut release = downloader
    ///     .download_to_temp("http://deb.example.org/dists/stable/Release")
    ///     .await?;
    /// let mut content = String::new();
    /// release.read_to_string(&mut content)?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_to_temp(&self, url: &str) -> Result<TempDownload> {
        let url = parse_url(url)?;

        let prefix = self.temp_prefix().to_owned();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new().prefix(&prefix).tempdir()
        })
        .await
        .map_err(|e| Error::Internal(format!("temporary directory task failed: {}", e)))?
        .map_err(|source| Error::Filesystem {
            path: std::env::temp_dir(),
            source,
        })?;
        let path = dir.path().join(BUFFER_FILENAME);
        debug!("Buffering {} into {:?}", url, path);

        let (tx, rx) = result_channel();
        self.download(url, &path, tx).await;
        rx.await
            .map_err(|_| Error::Internal("worker dropped the task without an outcome".into()))??;

        let file = fs::File::open(&path)
            .await
            .map_err(|source| Error::Filesystem {
                path: path.clone(),
                source,
            })?
            .into_std()
            .await;
        Ok(TempDownload { file, dir })
    }
}
