//! Expected checksums and the streaming checksum sink.
//!
//! A [`ChecksumInfo`] describes what a download is expected to look like. Its
//! `size` doubles as a switch: [`SKIP_VERIFICATION`] turns every check off,
//! any other value turns on the size check, and each hash is compared only
//! when its expected value is non-empty.
//!
//! [`ChecksumWriter`] computes the actual values while the body streams to
//! disk, so the downloaded file never has to be read twice.
//!
//! ```rust
//! use std::io::Write;
//! use fetchpool::checksum::{ChecksumInfo, ChecksumWriter};
//!
//! let mut sink = ChecksumWriter::new();
//! sink.write_all(b"Hello, World!").unwrap();
//! let actual = sink.sum();
//!
//! let expected = ChecksumInfo::with_size(13).md5("65a8e27d8879283831b664bd8b7f0ad4");
//! assert!(expected.mismatch(&actual).is_none());
//! ```

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Write};

/// Size sentinel disabling all verification.
pub const SKIP_VERIFICATION: i64 = -1;

/// Expected (or computed) size and digests of a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumInfo {
    /// Size in bytes, or [`SKIP_VERIFICATION`].
    pub size: i64,
    /// Hex-encoded MD5, empty to skip.
    pub md5: String,
    /// Hex-encoded SHA1, empty to skip.
    pub sha1: String,
    /// Hex-encoded SHA256, empty to skip.
    pub sha256: String,
}

impl Default for ChecksumInfo {
    fn default() -> Self {
        Self::skip()
    }
}

impl ChecksumInfo {
    /// No verification at all.
    pub fn skip() -> Self {
        Self {
            size: SKIP_VERIFICATION,
            md5: String::new(),
            sha1: String::new(),
            sha256: String::new(),
        }
    }

    /// Verify the size only; chain [`md5`](Self::md5), [`sha1`](Self::sha1)
    /// or [`sha256`](Self::sha256) to check digests too.
    pub fn with_size(size: i64) -> Self {
        Self {
            size,
            ..Self::skip()
        }
    }

    pub fn md5(mut self, md5: impl Into<String>) -> Self {
        self.md5 = md5.into();
        self
    }

    pub fn sha1(mut self, sha1: impl Into<String>) -> Self {
        self.sha1 = sha1.into();
        self
    }

    pub fn sha256(mut self, sha256: impl Into<String>) -> Self {
        self.sha256 = sha256.into();
        self
    }

    /// Whether the download has to go through the checksum sink.
    pub fn verification_requested(&self) -> bool {
        self.size != SKIP_VERIFICATION
    }

    /// Compare `actual` against these expectations.
    ///
    /// Fields are checked in the order size, md5, sha1, sha256 and the first
    /// mismatch is returned. Returns `None` when everything requested matches,
    /// or when verification is not requested at all.
    pub fn mismatch(&self, actual: &ChecksumInfo) -> Option<Mismatch> {
        if !self.verification_requested() {
            return None;
        }

        if actual.size != self.size {
            return Some(Mismatch {
                field: ChecksumField::Size,
                expected: self.size.to_string(),
                actual: actual.size.to_string(),
            });
        }

        [
            (ChecksumField::Md5, &self.md5, &actual.md5),
            (ChecksumField::Sha1, &self.sha1, &actual.sha1),
            (ChecksumField::Sha256, &self.sha256, &actual.sha256),
        ]
        .into_iter()
        .find(|(_, expected, actual)| {
            !expected.is_empty() && !expected.eq_ignore_ascii_case(actual)
        })
        .map(|(field, expected, actual)| Mismatch {
            field,
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}

/// A verified property of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumField {
    Size,
    Md5,
    Sha1,
    Sha256,
}

impl fmt::Display for ChecksumField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChecksumField::Size => "size",
            ChecksumField::Md5 => "md5",
            ChecksumField::Sha1 => "sha1",
            ChecksumField::Sha256 => "sha256",
        })
    }
}

/// The first field that did not match during verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub field: ChecksumField,
    pub expected: String,
    pub actual: String,
}

/// Incremental hasher fed through [`Write`].
#[derive(Clone, Default)]
pub struct ChecksumWriter {
    size: u64,
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
}

impl fmt::Debug for ChecksumWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumWriter")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl ChecksumWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Finalize the digests.
    pub fn sum(self) -> ChecksumInfo {
        ChecksumInfo {
            size: i64::try_from(self.size).unwrap_or(i64::MAX),
            md5: hex::encode(self.md5.finalize()),
            sha1: hex::encode(self.sha1.finalize()),
            sha256: hex::encode(self.sha256.finalize()),
        }
    }
}

impl Write for ChecksumWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.size += buf.len() as u64;
        self.md5.update(buf);
        self.sha1.update(buf);
        self.sha256.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &[u8] = b"Hello, World!";
    const HELLO_MD5: &str = "65a8e27d8879283831b664bd8b7f0ad4";
    const HELLO_SHA1: &str = "0a0a9f2a6772942557ab5355d76af442f8f65e01";
    const HELLO_SHA256: &str = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";

    fn hello_sum() -> ChecksumInfo {
        let mut sink = ChecksumWriter::new();
        sink.write_all(HELLO).unwrap();
        sink.sum()
    }

    #[test]
    fn test_sum_of_empty_input() {
        let sum = ChecksumWriter::new().sum();
        assert_eq!(sum.size, 0);
        assert_eq!(sum.md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(sum.sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            sum.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sum_is_independent_of_chunking() {
        let mut sink = ChecksumWriter::new();
        for chunk in HELLO.chunks(3) {
            sink.write_all(chunk).unwrap();
        }
        assert_eq!(sink.size(), 13);

        let sum = sink.sum();
        assert_eq!(sum, hello_sum());
        assert_eq!(sum.md5, HELLO_MD5);
        assert_eq!(sum.sha1, HELLO_SHA1);
        assert_eq!(sum.sha256, HELLO_SHA256);
    }

    #[test]
    fn test_skip_ignores_everything() {
        let expected = ChecksumInfo::skip().md5("deadbeef").sha256("deadbeef");
        assert!(!expected.verification_requested());
        assert!(expected.mismatch(&hello_sum()).is_none());
        assert_eq!(ChecksumInfo::default(), ChecksumInfo::skip());
    }

    #[test]
    fn test_all_fields_match() {
        let expected = ChecksumInfo::with_size(13)
            .md5(HELLO_MD5)
            .sha1(HELLO_SHA1)
            .sha256(HELLO_SHA256.to_uppercase());
        assert!(expected.mismatch(&hello_sum()).is_none());
    }

    #[test]
    fn test_size_is_checked_before_hashes() {
        let expected = ChecksumInfo::with_size(14).md5("deadbeef").sha1("deadbeef");
        let mismatch = expected.mismatch(&hello_sum()).unwrap();
        assert_eq!(mismatch.field, ChecksumField::Size);
        assert_eq!(mismatch.expected, "14");
        assert_eq!(mismatch.actual, "13");
    }

    #[test]
    fn test_first_wrong_hash_is_reported() {
        let expected = ChecksumInfo::with_size(13).md5("deadbeef").sha256("deadbeef");
        let mismatch = expected.mismatch(&hello_sum()).unwrap();
        assert_eq!(mismatch.field, ChecksumField::Md5);
        assert_eq!(mismatch.actual, HELLO_MD5);

        let expected = ChecksumInfo::with_size(13)
            .md5(HELLO_MD5)
            .sha1(HELLO_SHA1)
            .sha256("deadbeef");
        let mismatch = expected.mismatch(&hello_sum()).unwrap();
        assert_eq!(mismatch.field, ChecksumField::Sha256);
    }

    #[test]
    fn test_sha1_checked_before_sha256() {
        let expected = ChecksumInfo::with_size(13)
            .md5(HELLO_MD5)
            .sha1("deadbeef")
            .sha256("deadbeef");
        let mismatch = expected.mismatch(&hello_sum()).unwrap();
        assert_eq!(mismatch.field, ChecksumField::Sha1);
        assert_eq!(mismatch.actual, HELLO_SHA1);
    }

    #[test]
    fn test_empty_hashes_are_skipped() {
        let expected = ChecksumInfo::with_size(13).sha1(HELLO_SHA1);
        assert!(expected.mismatch(&hello_sum()).is_none());
    }

    #[test]
    fn test_field_display() {
        assert_eq!(ChecksumField::Size.to_string(), "size");
        assert_eq!(ChecksumField::Md5.to_string(), "md5");
        assert_eq!(ChecksumField::Sha1.to_string(), "sha1");
        assert_eq!(ChecksumField::Sha256.to_string(), "sha256");
    }
}
