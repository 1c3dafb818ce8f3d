use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fetchpool::download::ResultReceiver;
use fetchpool::{Downloader, DownloaderBuilder, Error};
use rand::RngCore;
use reqwest::Url;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Common test constants
pub const UNREACHABLE: &str = "http://127.0.0.1:1/";
pub const RELEASE: &[u8] = b"Origin: Debian\nSuite: stable\nCodename: bookworm\n";
pub const OUTCOME_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a file with the given content
pub fn create_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write file");
    file_path
}

/// Creates random content of the given size
pub fn random_content(size: usize) -> Vec<u8> {
    let mut content = vec![0; size];
    rand::rng().fill_bytes(&mut content);
    content
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).expect("Failed to gzip");
    encoder.finish().expect("Failed to gzip")
}

pub fn bzip2(data: &[u8]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(data).expect("Failed to bzip2");
    encoder.finish().expect("Failed to bzip2")
}

// === Downloader Helpers ===

/// Creates a downloader without progress bars or environment proxies
pub fn hidden_downloader(workers: usize) -> Downloader {
    hidden_builder(workers)
        .build()
        .expect("Failed to build downloader")
}

pub fn hidden_builder(workers: usize) -> DownloaderBuilder {
    DownloaderBuilder::hidden().workers(workers).no_proxy()
}

/// Waits for the outcome of a task
pub async fn outcome(rx: ResultReceiver) -> Result<(), Error> {
    tokio::time::timeout(OUTCOME_TIMEOUT, rx)
        .await
        .expect("Timed out waiting for the outcome")
        .expect("Task was dropped without an outcome")
}

// === Mock Server Helpers ===

/// Serves `body` at `route` with a 200 status
pub async fn serve(server: &MockServer, route: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Serves `body` at `route` after waiting for `delay`
pub async fn serve_slow(server: &MockServer, route: &str, body: &[u8], delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.to_vec())
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Answers `route` with the given status
pub async fn serve_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Asserts that `route` is never requested
pub async fn never_requested(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

/// Starts a server announcing a 1000 byte body but closing after 5 bytes
pub async fn truncated_body_server() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0; 4096];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\nhello")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    Url::parse(&format!("http://{}/Release", addr)).expect("Invalid server URL")
}

pub fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Invalid mock URL")
}

// === Assertion Helpers ===

/// Asserts that a file has the expected content
pub fn assert_content(path: &Path, expected: &[u8]) {
    let content = fs::read(path).expect("Failed to read file");
    assert_eq!(content, expected, "Content mismatch at path: {:?}", path);
}

/// Asserts that no temporary sibling was left behind
pub fn assert_no_temp(destination: &Path, suffix: &str) {
    let temp = fetchpool::download::temp_path(destination, suffix);
    assert!(!temp.exists(), "Temporary file left at path: {:?}", temp);
}
