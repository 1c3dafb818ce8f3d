//! Probe compressed variants of a URL.
//!
//! Repositories usually publish an index in several encodings and not every
//! mirror carries all of them. [`Downloader::download_try_compression`] tries
//! `url.bz2`, then `url.gz`, then `url` itself, and returns the first one that
//! downloads, wrapped in the matching decoder.

use crate::downloader::Downloader;
use crate::error::{Error, Result};
use crate::temp::{parse_url, TempDownload};

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Encoding of a probed candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Bzip2,
    Gzip,
    None,
}

impl Compression {
    /// Candidates in the order they are probed.
    pub const PROBE_ORDER: [Compression; 3] =
        [Compression::Bzip2, Compression::Gzip, Compression::None];

    /// Suffix appended to the base URL for this candidate.
    pub fn suffix(self) -> &'static str {
        match self {
            Compression::Bzip2 => ".bz2",
            Compression::Gzip => ".gz",
            Compression::None => "",
        }
    }

    fn magic(self) -> &'static [u8] {
        match self {
            Compression::Bzip2 => b"BZh",
            Compression::Gzip => &[0x1f, 0x8b],
            Compression::None => &[],
        }
    }

    /// Check that `reader` starts with this encoding's header, then rewind it.
    pub fn matches_header<R: Read + Seek>(self, reader: &mut R) -> io::Result<bool> {
        let magic = self.magic();
        let mut header = vec![0; magic.len()];
        let matched = match reader.read_exact(&mut header) {
            Ok(()) => header == magic,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => false,
            Err(e) => return Err(e),
        };
        reader.seek(SeekFrom::Start(0))?;
        Ok(matched)
    }

    /// Wrap `reader` in the decoder for this encoding.
    pub fn decoder<R: Read>(self, reader: R) -> Decoder<R> {
        match self {
            Compression::Bzip2 => Decoder::Bzip2(Box::new(MultiBzDecoder::new(reader))),
            Compression::Gzip => Decoder::Gzip(Box::new(MultiGzDecoder::new(reader))),
            Compression::None => Decoder::Passthrough(reader),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
            Compression::None => "uncompressed",
        })
    }
}

/// Decoder wrapper yielding the uncompressed bytes.
pub enum Decoder<R> {
    Passthrough(R),
    Gzip(Box<MultiGzDecoder<R>>),
    Bzip2(Box<MultiBzDecoder<R>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            Self::Bzip2(d) => d.read(buf),
        }
    }
}

/// The decoded stream of the first candidate that could be downloaded.
///
/// The underlying temporary file is removed when this is dropped.
pub struct Decompressed {
    compression: Compression,
    path: PathBuf,
    reader: Decoder<TempDownload>,
}

impl Decompressed {
    /// Which candidate was downloaded.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Path of the downloaded file, before decoding.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for Decompressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decompressed")
            .field("compression", &self.compression)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Read for Decompressed {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Downloader {
    /// Download the first available of `url.bz2`, `url.gz` and `url`.
    ///
    /// A candidate fails when its download fails or when the file does not
    /// start with the expected header. Probing stops at the first success; if
    /// every candidate fails, the error of the last one is returned.
    ///
    /// ```rust,no_run
    /// use std::io::Read;
    /// use fetchpool::downloader::DownloaderBuilder;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let downloader = DownloaderBuilder::new().build()?;
    /// let mut packages = downloader
    ///     .download_try_compression("http://deb.example.org/dists/stable/main/binary-amd64/Packages")
    ///     .await?;
    /// let mut index = String::new();
    /// packages.read_to_string(&mut index)?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_try_compression(&self, url: &str) -> Result<Decompressed> {
        let mut last_error = Error::Internal("no compression candidates".into());

        for compression in Compression::PROBE_ORDER {
            let candidate = format!("{}{}", url, compression.suffix());

            let mut buffer = match self.download_to_temp(&candidate).await {
                Ok(buffer) => buffer,
                Err(e) => {
                    debug!("Candidate {} unavailable: {}", candidate, e);
                    last_error = e;
                    continue;
                }
            };

            match compression.matches_header(&mut buffer) {
                Ok(true) => {
                    debug!("Using {} candidate {}", compression, candidate);
                    return Ok(Decompressed {
                        compression,
                        path: buffer.path(),
                        reader: compression.decoder(buffer),
                    });
                }
                Ok(false) => {
                    debug!("Candidate {} is not {}", candidate, compression);
                    last_error = Error::Decode {
                        url: parse_url(&candidate)?,
                        compression,
                    };
                }
                Err(source) => {
                    last_error = Error::Filesystem {
                        path: buffer.path(),
                        source,
                    };
                }
            }
        }

        Err(last_error)
    }
}
