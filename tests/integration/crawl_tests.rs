//! Integration tests for the crawler
//!
//! These tests use wiremock to serve RFC-style documents and run the full crawl cycle
//! end-to-end over HTTP.

use rfc_crawler::config::{Config, CrawlerConfig, ReferenceConfig, UserAgentConfig};
use rfc_crawler::crawler::{crawl, Crawler};
use rfc_crawler::CancellationToken;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that resolves citations against the mock server
fn create_test_config(base_url: &str, seed_url: String, workers: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers,
            pages_per_second: 50,
            idle_timeout_ms: 300, // Very short for testing
            crawl_timeout_secs: 10,
            seed_url,
        },
        references: ReferenceConfig {
            base_url: format!("{}/", base_url),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            connect_timeout_secs: 5,
        },
    }
}

/// Renders a two-page document; citations on the second page are followed by a footer
fn rfc_document(number: u32, citations: &[u32]) -> String {
    let cited: Vec<String> = citations.iter().map(|c| format!("[RFC {}]", c)).collect();
    format!(
        "Network Working Group                                   RFC {number}\n\
         \n\
         Status of this Memo\n\
         \n\
         Author                      Informational                      [Page 1]\n\
         \x0c\n\
         RFC {number}                    Test Document                  October 2026\n\
         \n\
         This document builds on {}.\n\
         \n\
         Author                      Informational                      [Page 2]\n",
        cited.join(" and ")
    )
}

async fn mount_document(server: &MockServer, number: u32, citations: &[u32]) {
    Mock::given(method("GET"))
        .and(path(format!("/rfc{}.txt", number)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rfc_document(number, citations))
                .insert_header("content-type", "text/plain"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_citation_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The seed is not an RFC path; only its citation maps onto the template
    Mock::given(method("GET"))
        .and(path("/seed.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "This memo updates [RFC 1912].\n\
             Author                      Informational                      [Page 1]\n",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_document(&mock_server, 1912, &[]).await;

    let seed = format!("{}/seed.txt", base_url);
    let config = create_test_config(&base_url, seed.clone(), 2);

    let summary = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    // Visited URLs come back sorted
    assert_eq!(
        summary.visited,
        vec![format!("{}/rfc1912.txt", base_url), seed]
    );
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.failed, 0);
    assert!(!summary.cancelled);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_mutual_citations_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(&mock_server, 1000, &[2000]).await;
    mount_document(&mock_server, 2000, &[1000]).await;

    let config = create_test_config(&base_url, format!("{}/rfc1000.txt", base_url), 4);
    let crawler = Crawler::new(&config, CancellationToken::new()).expect("Failed to build crawler");

    let summary = crawler.run(config.crawler.seed_url.clone()).await;

    assert_eq!(summary.visited.len(), 2);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.idle_expired_workers, 4);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_citation_graph_with_broken_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_document(&mock_server, 1034, &[1035, 1033, 9999]).await;
    mount_document(&mock_server, 1035, &[1034, 2181]).await;
    mount_document(&mock_server, 1033, &[1034]).await;
    mount_document(&mock_server, 2181, &[1035, 1034]).await;

    // rfc9999 does not exist
    Mock::given(method("GET"))
        .and(path("/rfc9999.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, format!("{}/rfc1034.txt", base_url), 3);
    let summary = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.visited.len(), 5);
    assert_eq!(summary.fetched, 4);
    assert_eq!(summary.failed, 1);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_citations_on_unterminated_page_are_ignored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/rfc1.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Cites [RFC 2]\n\
             Author                      Informational                      [Page 1]\n\
             Also cites [RFC 3] but the page never ends\n",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_document(&mock_server, 2, &[]).await;
    Mock::given(method("GET"))
        .and(path("/rfc3.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, format!("{}/rfc1.txt", base_url), 1);
    let summary = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.visited.len(), 2);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_cancellation_ends_crawl_promptly() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let cited: Vec<u32> = (2..40).collect();
    Mock::given(method("GET"))
        .and(path("/rfc1.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rfc_document(1, &cited)))
        .mount(&mock_server)
        .await;
    // Every cited document is slow to answer
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rfc_document(0, &[]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, format!("{}/rfc1.txt", base_url), 4);
    config.crawler.idle_timeout_ms = 10_000;
    config.crawler.crawl_timeout_secs = 60;

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { crawl(&config, cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    let start = Instant::now();
    cancel.cancel();

    let summary = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("Crawl did not stop after cancellation")
        .unwrap()
        .expect("Crawl failed");

    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(summary.cancelled);
    assert_eq!(summary.cancelled_workers, 4);
    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.visited.len(), 39);
}

#[tokio::test]
async fn test_slow_document_within_crawl_timeout_is_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/rfc1.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rfc_document(1, &[]))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Slower than the connect timeout, well inside the per-document bound
    let mut config = create_test_config(&base_url, format!("{}/rfc1.txt", base_url), 1);
    config.user_agent.connect_timeout_secs = 1;
    config.crawler.crawl_timeout_secs = 60;

    let summary = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.timed_out, 0);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_document_exceeding_crawl_timeout_is_abandoned() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/rfc1.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(rfc_document(1, &[2]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, format!("{}/rfc1.txt", base_url), 1);
    config.crawler.crawl_timeout_secs = 1;

    let summary = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.timed_out, 1);
    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.visited.len(), 1);
}
