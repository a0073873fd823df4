//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: query → throttled HTTP requests → HTML
//! extraction → merged result sets

use scholar_pager::config::ScholarConfig;
use scholar_pager::extract::{ExtractionRules, ScholarExtractor};
use scholar_pager::http::{HttpClientConfig, HttpFetcher};
use scholar_pager::{Error, Query, QueryEncoder, Searcher, ThrottleConfig, ThrottledQueue};
use std::fmt::Write as _;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

/// Render a result page in the provider's current markup
fn result_page(
    prefix: &str,
    count: usize,
    total: Option<&str>,
    prev: Option<u32>,
    next: Option<u32>,
) -> String {
    let mut html = String::from("<html><body>");
    if let Some(total) = total {
        let _ = write!(html, r#"<div id="gs_ab_md"><div>{total} (<b>0.03</b> sec)</div></div>"#);
    }
    for i in 0..count {
        let _ = write!(
            html,
            r#"<div class="gs_r gs_or gs_scl"><div class="gs_ri">
<h3 class="gs_rt"><a href="https://example.org/{prefix}/{i}">{prefix} paper {i}</a></h3>
<div class="gs_a"><a href="/citations?user=U{i}">A Author</a>, B Author - Venue, 2020 - example.org</div>
<div class="gs_rs">Snippet {i}</div>
<div class="gs_fl"><a href="/scholar?cites={i}">Cited by {}</a> <a href="/scholar?q=related:{i}">Related articles</a></div>
</div></div>"#,
            i + 1
        );
    }
    html.push_str(r#"<div id="gs_n"><table><tr>"#);
    if let Some(start) = prev {
        let _ = write!(
            html,
            r#"<td><a href="/scholar?q=rust&amp;start={start}"><span class="gs_ico gs_ico_nav_previous"></span>Previous</a></td>"#
        );
    }
    if let Some(start) = next {
        let _ = write!(
            html,
            r#"<td><a href="/scholar?q=rust&amp;start={start}"><span class="gs_ico gs_ico_nav_next"></span>Next</a></td>"#
        );
    }
    html.push_str("</tr></table></div></body></html>");
    html
}

async fn mount_page(server: &MockServer, start: Option<u32>, body: String) {
    let mock = Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("q", "rust"));
    let mock = match start {
        Some(start) => mock.and(query_param("start", start.to_string())),
        None => mock.and(query_param_is_missing("start")),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn fast_queue() -> ThrottledQueue {
    ThrottledQueue::new(&ThrottleConfig::new(50, Duration::from_millis(100))).unwrap()
}

fn searcher_for(server: &MockServer, fetcher: HttpFetcher) -> Searcher {
    let extractor = ScholarExtractor::with_rules(ExtractionRules::current(), &server.uri()).unwrap();
    let encoder = QueryEncoder::new(&format!("{}/scholar", server.uri())).unwrap();
    Searcher::new(fast_queue(), fetcher, extractor, encoder)
}

// ============================================================================
// Full Search Tests
// ============================================================================

#[tokio::test]
async fn test_search_all_merges_pages_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, None, result_page("a", 10, Some("About 25 results"), None, Some(10))).await;
    mount_page(&server, Some(10), result_page("b", 10, Some("About 25 results"), Some(0), Some(20))).await;
    mount_page(&server, Some(20), result_page("c", 5, Some("About 25 results"), Some(10), None)).await;

    let searcher = searcher_for(&server, HttpFetcher::new().unwrap());
    let set = searcher.search_all(&Query::new("rust")).await.unwrap();

    assert_eq!(set.len(), 25);
    assert_eq!(set.total, 25);
    assert_eq!(set.pages_fetched, 3);
    assert_eq!(set.records[0].title, "a paper 0");
    assert_eq!(set.records[10].title, "b paper 0");
    assert_eq!(set.records[24].title, "c paper 4");
    assert!(!set.has_next());
    assert!(!set.has_previous());

    let record = &set.records[1];
    assert_eq!(record.cited_count, 2);
    assert_eq!(
        record.cited_url.as_deref(),
        Some(format!("{}/scholar?cites=1", server.uri()).as_str())
    );
    assert_eq!(record.authors.len(), 2);
    assert_eq!(record.authors[0].url, format!("{}/citations?user=U1", server.uri()));
}

#[tokio::test]
async fn test_search_all_single_page_without_count() {
    let server = MockServer::start().await;
    mount_page(&server, None, result_page("a", 4, None, None, Some(10))).await;

    let searcher = searcher_for(&server, HttpFetcher::new().unwrap());
    let set = searcher.search_all(&Query::new("rust")).await.unwrap();

    assert_eq!(set.len(), 4);
    assert_eq!(set.total, 4);
    assert!(!set.has_next());
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[tokio::test]
async fn test_search_then_navigate() {
    let server = MockServer::start().await;
    mount_page(&server, None, result_page("a", 10, Some("About 30 results"), None, Some(10))).await;
    mount_page(&server, Some(10), result_page("b", 10, Some("About 30 results"), Some(0), Some(20))).await;

    let searcher = searcher_for(&server, HttpFetcher::new().unwrap());
    let first = searcher.search(&Query::new("rust")).await.unwrap();
    assert_eq!(first.total, 30);
    assert!(!first.has_previous());

    let second = first.next().await.unwrap();
    assert_eq!(second.records[0].title, "b paper 0");
    assert_eq!(
        second.prev_url.as_deref(),
        Some(format!("{}/scholar?q=rust&start=0", server.uri()).as_str())
    );

    let err = first.previous().await.unwrap_err();
    assert!(matches!(err, Error::NoAdjacentPage { .. }));
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_follow_up_timeout_fails_search() {
    let server = MockServer::start().await;
    mount_page(&server, None, result_page("a", 10, Some("About 30 results"), None, Some(10))).await;
    mount_page(&server, Some(10), result_page("b", 10, None, Some(0), Some(20))).await;
    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("start", "20"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(result_page("c", 10, None, None, None))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::with_config(
        HttpClientConfig::builder()
            .timeout(Duration::from_millis(500))
            .build(),
    )
    .unwrap();
    let err = searcher_for(&server, fetcher)
        .search_all(&Query::new("rust"))
        .await
        .unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

#[tokio::test]
async fn test_rate_limit_page_fails_search() {
    let server = MockServer::start().await;
    mount_page(&server, None, result_page("a", 10, Some("About 20 results"), None, Some(10))).await;
    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("start", "10"))
        .respond_with(ResponseTemplate::new(503).set_body_string(
            "<html>Our systems have detected unusual traffic from your computer network.</html>",
        ))
        .mount(&server)
        .await;

    let err = searcher_for(&server, HttpFetcher::new().unwrap())
        .search_all(&Query::new("rust"))
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
}

// ============================================================================
// Config Tests
// ============================================================================

#[tokio::test]
async fn test_searcher_from_yaml_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("q", "rust"))
        .and(query_param("hl", "en"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(result_page("a", 3, Some("3 results"), None, None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let yaml = format!(
        r"
base_url: {uri}/scholar
params:
  hl: en
throttle:
  max_per_interval: 10
  interval_ms: 200
extractor:
  link_base: {uri}
",
        uri = server.uri()
    );
    let config = ScholarConfig::from_yaml_str(&yaml).unwrap();
    let queue = ThrottledQueue::new(&config.throttle).unwrap();
    let searcher = Searcher::from_config(&config, queue).unwrap();

    let set = searcher.search_all(&Query::new("rust")).await.unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.total, 3);
    assert_eq!(set.records[2].url, "https://example.org/a/2");
}
