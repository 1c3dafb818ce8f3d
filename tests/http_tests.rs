//! Tests for HTTP module functionality.

use fetchpool::http::{create_http_client, HttpClientConfig};

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::helpers::*;

#[test]
fn test_create_http_client_with_proxy() {
    let config = HttpClientConfig {
        proxy: Some(reqwest::Proxy::all("http://127.0.0.1:3128").unwrap()),
        ..HttpClientConfig::default()
    };
    assert!(create_http_client(config).is_ok());
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Release"))
        .and(header("user-agent", "mirror/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(RELEASE.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("mirror/1.0"));
    let client = create_http_client(HttpClientConfig {
        no_proxy: true,
        headers: Some(headers),
        ..HttpClientConfig::default()
    })
    .unwrap();

    let res = client.get(url(&server, "/Release")).send().await.unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.bytes().await.unwrap().as_ref(), RELEASE);
}

#[tokio::test]
async fn test_downloader_sends_builder_headers() {
    let temp_dir = create_temp_dir();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Release"))
        .and(header("user-agent", "mirror/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(RELEASE.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let downloader = hidden_builder(1)
        .header(USER_AGENT, HeaderValue::from_static("mirror/1.0"))
        .build()
        .unwrap();
    let (tx, rx) = fetchpool::result_channel();
    downloader
        .download(url(&server, "/Release"), temp_dir.path().join("Release"), tx)
        .await;

    outcome(rx).await.expect("Download should succeed");
    downloader.shutdown().await;
}
