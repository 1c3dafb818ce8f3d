//! Integration tests for the fetchpool crate.
//!
//! These tests cover the helpers built on top of the worker pool: ephemeral
//! downloads into a temporary directory and probing compressed variants of
//! a URL.

use fetchpool::temp::BUFFER_FILENAME;
use fetchpool::{Compression, Error};

use std::io::Read;
use wiremock::MockServer;

mod common;
use common::helpers::*;

const PACKAGES: &[u8] = b"Package: fetchpool\nVersion: 0.1.0\nArchitecture: amd64\n";

#[tokio::test]
async fn test_download_to_temp() {
    let server = MockServer::start().await;
    let content = random_content(32 * 1024);
    serve(&server, "/dists/stable/Release", &content).await;

    let downloader = hidden_downloader(2);
    let mut buffer = downloader
        .download_to_temp(url(&server, "/dists/stable/Release").as_str())
        .await
        .expect("Download should succeed");

    let path = buffer.path();
    assert_eq!(path.file_name().unwrap(), BUFFER_FILENAME);
    assert_eq!(buffer.len().unwrap(), content.len() as u64);

    let mut read = Vec::new();
    buffer.read_to_end(&mut read).unwrap();
    assert_eq!(read, content);

    let dir = path.parent().unwrap().to_path_buf();
    assert!(dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("fetchpool"));

    drop(buffer);
    assert!(!dir.exists(), "Temporary directory should be removed on drop");
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_downloads_to_temp() {
    let server = MockServer::start().await;
    serve(&server, "/Release", RELEASE).await;
    serve(&server, "/InRelease", PACKAGES).await;

    let downloader = hidden_downloader(2);
    let release_url = url(&server, "/Release");
    let in_release_url = url(&server, "/InRelease");
    let (release, in_release) = tokio::join!(
        downloader.download_to_temp(release_url.as_str()),
        downloader.download_to_temp(in_release_url.as_str()),
    );
    let (mut release, mut in_release) = (release.unwrap(), in_release.unwrap());
    assert_ne!(release.path(), in_release.path());

    let mut read = Vec::new();
    release.read_to_end(&mut read).unwrap();
    assert_eq!(read, RELEASE);
    read.clear();
    in_release.read_to_end(&mut read).unwrap();
    assert_eq!(read, PACKAGES);
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_download_to_temp_with_custom_prefix() {
    let server = MockServer::start().await;
    serve(&server, "/Release", RELEASE).await;

    let downloader = hidden_builder(1).temp_prefix("mirror-").build().unwrap();
    let buffer = downloader
        .download_to_temp(url(&server, "/Release").as_str())
        .await
        .unwrap();

    let dir = buffer.path().parent().unwrap().to_path_buf();
    assert!(dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("mirror-"));
    assert!(!buffer.is_empty().unwrap());
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_download_to_temp_failure() {
    let server = MockServer::start().await;
    serve_status(&server, "/Release", 404).await;

    let downloader = hidden_downloader(1);
    match downloader
        .download_to_temp(url(&server, "/Release").as_str())
        .await
    {
        Err(Error::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 404),
        other => panic!("Expected an HTTP status error, got {:?}", other),
    }
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_download_to_temp_invalid_url() {
    let downloader = hidden_downloader(1);
    assert!(matches!(
        downloader.download_to_temp("not a url").await,
        Err(Error::InvalidUrl(_))
    ));
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_download_to_temp_after_shutdown() {
    let downloader = hidden_downloader(1);
    downloader.shutdown().await;

    assert!(matches!(
        downloader.download_to_temp(UNREACHABLE).await,
        Err(Error::Stopped)
    ));
}

#[tokio::test]
async fn test_try_compression_prefers_bzip2() {
    let server = MockServer::start().await;
    serve(&server, "/Packages.bz2", &bzip2(PACKAGES)).await;
    never_requested(&server, "/Packages.gz").await;
    never_requested(&server, "/Packages").await;

    let downloader = hidden_downloader(1);
    let mut packages = downloader
        .download_try_compression(url(&server, "/Packages").as_str())
        .await
        .expect("bz2 candidate should be used");

    assert_eq!(packages.compression(), Compression::Bzip2);
    let buffered = packages.path().to_path_buf();
    assert_content(&buffered, &bzip2(PACKAGES));

    let mut read = Vec::new();
    packages.read_to_end(&mut read).unwrap();
    assert_eq!(read, PACKAGES);

    drop(packages);
    assert!(!buffered.exists());
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_try_compression_falls_back_to_gzip() {
    let server = MockServer::start().await;
    serve_status(&server, "/Packages.bz2", 404).await;
    serve(&server, "/Packages.gz", &gzip(PACKAGES)).await;
    never_requested(&server, "/Packages").await;

    let downloader = hidden_downloader(1);
    let mut packages = downloader
        .download_try_compression(url(&server, "/Packages").as_str())
        .await
        .expect("gz candidate should be used");

    assert_eq!(packages.compression(), Compression::Gzip);
    let mut read = String::new();
    packages.read_to_string(&mut read).unwrap();
    assert_eq!(read.as_bytes(), PACKAGES);
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_try_compression_falls_back_to_raw() {
    let server = MockServer::start().await;
    serve(&server, "/Packages", PACKAGES).await;

    let downloader = hidden_downloader(1);
    let mut packages = downloader
        .download_try_compression(url(&server, "/Packages").as_str())
        .await
        .expect("raw candidate should be used");

    assert_eq!(packages.compression(), Compression::None);
    let mut read = Vec::new();
    packages.read_to_end(&mut read).unwrap();
    assert_eq!(read, PACKAGES);
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_try_compression_skips_invalid_header() {
    let server = MockServer::start().await;
    // The .gz candidate is served but is not gzip at all.
    serve(&server, "/Packages.gz", b"<html>not found</html>").await;
    serve(&server, "/Packages", PACKAGES).await;

    let downloader = hidden_downloader(1);
    let mut packages = downloader
        .download_try_compression(url(&server, "/Packages").as_str())
        .await
        .expect("raw candidate should be used");

    assert_eq!(packages.compression(), Compression::None);
    let mut read = Vec::new();
    packages.read_to_end(&mut read).unwrap();
    assert_eq!(read, PACKAGES);
    downloader.shutdown().await;
}

#[tokio::test]
async fn test_try_compression_returns_last_error() {
    let server = MockServer::start().await;
    serve_status(&server, "/Packages.bz2", 500).await;
    serve_status(&server, "/Packages.gz", 403).await;

    let downloader = hidden_downloader(1);
    match downloader
        .download_try_compression(url(&server, "/Packages").as_str())
        .await
    {
        Err(Error::HttpStatus { status, url }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(url.path(), "/Packages");
        }
        other => panic!("Expected the raw candidate's error, got {:?}", other),
    }
    downloader.shutdown().await;
}
