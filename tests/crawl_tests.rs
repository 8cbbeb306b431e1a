//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use sitegrep::config::Config;
use sitegrep::crawler::{run_crawl, StopReason};
use sitegrep::output::{JsonReportWriter, ReportWriter};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with small worker pools
fn create_test_config(max_depth: u32, max_matches: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.crawl_workers = 4;
    config.crawler.extract_workers = 2;
    config.crawler.max_url_match_count = max_matches;
    config.crawler.request_timeout_secs = 5;
    config.crawler.timeout_secs = Some(30);
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: &str, body: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">Page 1</a> <a href="/page2">Page 2</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/page1", "The needle is here", 1).await;
    mount_page(&mock_server, "/page2", "Nothing to see", 1).await;

    let seeds = vec![format!("{}/", mock_server.uri())];
    let report = run_crawl(&create_test_config(2, 5), &seeds, "needle")
        .await
        .expect("Crawl failed");

    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(report.visited_count, 3);
    assert_eq!(report.documents.len(), 3);
    assert_eq!(
        report.matched_urls,
        vec![format!("{}/page1", mock_server.uri())]
    );
}

#[tokio::test]
async fn test_shared_links_fetched_once() {
    let mock_server = MockServer::start().await;

    // Every page links to every other page, including itself
    let links = r#"<a href="/">home</a> <a href="/a">a</a> <a href="/b">b</a>
        <a href="/shared">shared</a> <a href="/shared#again">shared again</a>
        <a href="/a#section">a fragment</a>"#;
    for page in ["/", "/a", "/b", "/shared"] {
        mount_page(&mock_server, page, links, 1).await;
    }

    let seeds = vec![format!("{}/", mock_server.uri()), mock_server.uri()];
    let report = run_crawl(&create_test_config(3, 5), &seeds, "absent")
        .await
        .expect("Crawl failed");

    // Wiremock verifies the expect(1) counts when the server drops
    assert_eq!(report.visited_count, 4);
    assert_eq!(report.documents.len(), 4);
    assert!(report.matched_urls.is_empty());
}

#[tokio::test]
async fn test_directory_pages_keep_their_trailing_slash() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/docs/",
        r#"<a href="guide">Guide</a> <a href="../docs">Index again</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/docs/guide", "the needle", 1).await;
    mount_page(&mock_server, "/guide", "wrong place", 0).await;

    let seeds = vec![format!("{}/docs/", mock_server.uri())];
    let report = run_crawl(&create_test_config(2, 5), &seeds, "needle")
        .await
        .expect("Crawl failed");

    assert_eq!(
        report.matched_urls,
        vec![format!("{}/docs/guide", mock_server.uri())]
    );
    assert_eq!(
        report.visited_urls,
        vec![
            format!("{}/docs", mock_server.uri()),
            format!("{}/docs/guide", mock_server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new/"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new/", r#"<a href="page">page</a>"#, 1).await;
    mount_page(&mock_server, "/new/page", "needle", 1).await;

    let seeds = vec![format!("{}/old", mock_server.uri())];
    let report = run_crawl(&create_test_config(2, 5), &seeds, "needle")
        .await
        .expect("Crawl failed");

    assert_eq!(
        report.matched_urls,
        vec![format!("{}/new/page", mock_server.uri())]
    );
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/level1">1</a>"#, 1).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">2</a>"#, 1).await;
    // Should never be called with max_depth=1
    mount_page(&mock_server, "/level2", "too deep", 0).await;

    let seeds = vec![format!("{}/", mock_server.uri())];
    let report = run_crawl(&create_test_config(1, 5), &seeds, "deep")
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited_count, 2);
    assert!(report.matched_urls.is_empty());
}

#[tokio::test]
async fn test_other_hosts_are_not_crawled() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    // Same machine, but "localhost" is a different host name than 127.0.0.1
    let other_port = other_server.address().port();
    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="http://localhost:{}/away">away</a> <a href="/home">home</a>"#,
            other_port
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/home", "home page", 1).await;
    mount_page(&other_server, "/away", "needle", 0).await;

    let seeds = vec![format!("{}/", mock_server.uri())];
    let report = run_crawl(&create_test_config(2, 5), &seeds, "needle")
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited_count, 2);
    assert!(report.matched_urls.is_empty());
}

#[tokio::test]
async fn test_unreachable_seed_yields_empty_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seeds = vec![format!("{}/", mock_server.uri())];
    let report = run_crawl(&create_test_config(2, 5), &seeds, "needle")
        .await
        .expect("Crawl failed");

    assert!(report.documents.is_empty());
    assert!(report.matched_urls.is_empty());
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_non_text_responses_are_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"needle <a href="/image.png">img</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x89, b'P', b'N', b'G'])
                .insert_header("content-type", "image/png"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let seeds = vec![format!("{}/", mock_server.uri())];
    let report = run_crawl(&create_test_config(2, 5), &seeds, "needle")
        .await
        .expect("Crawl failed");

    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_threshold_stops_following_links() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"needle <a href="/m1">1</a> <a href="/m2">2</a> <a href="/m3">3</a>"#,
        1,
    )
    .await;
    for page in ["/m1", "/m2", "/m3"] {
        mount_page(&mock_server, page, "needle", 0).await;
    }

    let seeds = vec![format!("{}/", mock_server.uri())];
    let report = run_crawl(&create_test_config(2, 1), &seeds, "needle")
        .await
        .expect("Crawl failed");

    assert_eq!(report.stop_reason, StopReason::ThresholdReached);
    assert_eq!(report.matched_urls.len(), 1);
    assert_eq!(report.visited_count, 1);
}

#[tokio::test]
async fn test_case_insensitive_search_and_json_export() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "Hello NEEDLE world", 1).await;

    let mut config = create_test_config(0, 5);
    config.search.case_insensitive = true;

    let seeds = vec![format!("{}/", mock_server.uri())];
    let report = run_crawl(&config, &seeds, "needle")
        .await
        .expect("Crawl failed");
    assert_eq!(report.matched_urls.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let writer = JsonReportWriter::new(dir.path().join("document_results.json"));
    writer.write(&report).expect("Failed to write report");

    let raw = std::fs::read_to_string(writer.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["documents"][0]["text"], "Hello NEEDLE world");
    assert_eq!(value["documents"][0]["matched"], true);
    assert_eq!(
        value["visited_urls"][0],
        format!("{}/", mock_server.uri())
    );
}
