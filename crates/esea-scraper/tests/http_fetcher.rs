//! Integration tests for `HttpFetcher` against a local `wiremock` server.

use std::time::{Duration, Instant};

use esea_core::MatchId;
use esea_scraper::{FetchError, HttpFetcher, PageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><body><div id="match-stats"></div></body></html>"#;

fn id() -> MatchId {
    MatchId::new(14_633_571).unwrap()
}

fn test_fetcher(base: &str, max_retries: u32) -> HttpFetcher {
    HttpFetcher::new(base, 5, "esea-test/0.1", max_retries, 0)
        .expect("failed to build test HttpFetcher")
}

#[tokio::test]
async fn fetch_returns_page_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_fetcher(&server.uri(), 0).fetch(id()).await.unwrap();
    assert_eq!(page.match_id, id());
    assert_eq!(page.html, PAGE);
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;

    let base = format!("{}/", server.uri());
    let page = test_fetcher(&base, 0).fetch(id()).await;
    assert!(page.is_ok(), "expected Ok, got: {page:?}");
}

#[tokio::test]
async fn not_found_is_typed_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_fetcher(&server.uri(), 3).fetch(id()).await.unwrap_err();
    assert!(
        matches!(err, FetchError::NotFound { ref url } if url.ends_with("/match/14633571")),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn rate_limit_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_fetcher(&server.uri(), 2).fetch(id()).await;
    assert!(page.is_ok(), "expected Ok after retries, got: {page:?}");
}

#[tokio::test]
async fn rate_limit_waits_for_retry_after_before_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    let page = test_fetcher(&server.uri(), 1).fetch(id()).await;
    let elapsed = started.elapsed();

    assert!(page.is_ok(), "expected Ok after retry, got: {page:?}");
    assert!(
        elapsed >= Duration::from_secs(1),
        "retried after {elapsed:?} despite Retry-After: 1"
    );
}

#[tokio::test]
async fn rate_limit_without_retries_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let err = test_fetcher(&server.uri(), 0).fetch(id()).await.unwrap_err();
    assert!(
        matches!(err, FetchError::RateLimited { retry_after_secs: 30, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn server_error_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let err = test_fetcher(&server.uri(), 2).fetch(id()).await.unwrap_err();
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 502, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_fetcher(&server.uri(), 3).fetch(id()).await.unwrap_err();
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 403, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn blank_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/14633571"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
        .mount(&server)
        .await;

    let err = test_fetcher(&server.uri(), 0).fetch(id()).await.unwrap_err();
    assert!(matches!(err, FetchError::EmptyBody { .. }), "got: {err:?}");
}
