//! Tests for the HTTP fetcher module

use super::*;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.user_agent.starts_with("scholar-pager/"));
    assert_eq!(config.rate_limit_marker, DEFAULT_RATE_LIMIT_MARKER);
    assert!(config.default_headers.is_empty());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .header("Accept-Language", "en")
        .user_agent("test-agent/1.0")
        .rate_limit_marker("captcha")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(
        config.default_headers.get("Accept-Language"),
        Some(&"en".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert_eq!(config.rate_limit_marker, "captcha");
}

#[tokio::test]
async fn test_fetch_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let body = fetcher
        .fetch(&format!("{}/scholar?q=rust", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn test_fetch_sends_user_agent_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(header("User-Agent", "test-agent/1.0"))
        .and(header("Accept-Language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .user_agent("test-agent/1.0")
        .header("Accept-Language", "en")
        .build();
    let fetcher = HttpFetcher::with_config(config).unwrap();

    let body = fetcher
        .fetch(&format!("{}/scholar", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_fetch_rate_limit_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(ResponseTemplate::new(503).set_body_string(
            "<html>Our systems have detected unusual traffic from your computer network.</html>",
        ))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher
        .fetch(&format!("{}/scholar", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_fetch_too_many_requests_is_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { status: 429, .. }));
}

#[tokio::test]
async fn test_fetch_plain_503_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();

    assert!(!err.is_rate_limited());
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404: Not found");
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_error() {
    // Nothing listens on the tcpmux port on test machines
    let uri = "http://127.0.0.1:1/scholar";

    let fetcher = HttpFetcher::with_config(
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(2))
            .build(),
    )
    .unwrap();
    let err = fetcher.fetch(uri).await.unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
}
