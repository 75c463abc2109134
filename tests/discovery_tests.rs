//! Discovery and fetching against a mock site
//!
//! The site has a reachable homepage and `/about` page and an unreachable
//! `/pricing` page; robots.txt and sitemaps are absent.

mod common;

use common::{content_page, test_config, test_pipeline};
use site_intel::config::UserAgentConfig;
use site_intel::fetcher::{ConcurrentFetcher, HttpFetcher};
use site_intel::state::RateLimiter;
use site_intel::DiscoveredVia;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn acme_site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content_page(
            "Acme Widgets",
            "Acme builds industrial widgets for mid-sized factories. ",
            &["/about", "/pricing", "/privacy", "/brochure.pdf", "https://elsewhere.test/"],
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content_page(
            "About Acme",
            "Founded in 1999, Acme serves plant managers across Europe. ",
            &[],
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pricing"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_discover_includes_seed_and_guesses() {
    let server = acme_site().await;
    let pipeline = test_pipeline(test_config(&server.uri()));

    let pages = pipeline.discover_pages(&server.uri(), 15).await.unwrap();
    let homepage = format!("{}/", server.uri());

    assert!(pages.len() <= 15);
    assert_eq!(pages[0], homepage);
    assert!(pages.contains(&format!("{}/about", server.uri())));
    // Reachability is only checked at fetch time
    assert!(pages.contains(&format!("{}/pricing", server.uri())));
    assert!(!pages.iter().any(|p| p.contains("privacy") || p.ends_with(".pdf")));
    assert!(!pages.iter().any(|p| p.contains("elsewhere.test")));
}

#[tokio::test]
async fn test_candidates_sorted_by_priority() {
    let server = acme_site().await;
    let pipeline = test_pipeline(test_config(&server.uri()));

    let candidates = pipeline
        .discover_candidates(&server.uri(), 15)
        .await
        .unwrap();

    assert_eq!(candidates[0].discovered_via, DiscoveredVia::Seed);
    assert!(candidates
        .windows(2)
        .all(|w| w[0].priority_score >= w[1].priority_score));

    let unique: HashSet<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(unique.len(), candidates.len());
}

#[tokio::test]
async fn test_discover_respects_small_budget() {
    let server = acme_site().await;
    let pipeline = test_pipeline(test_config(&server.uri()));

    let pages = pipeline.discover_pages(&server.uri(), 3).await.unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0], format!("{}/", server.uri()));
}

#[tokio::test]
async fn test_fetch_all_returns_only_reachable_pages() {
    let server = acme_site().await;
    let pipeline = test_pipeline(test_config(&server.uri()));

    let urls: Vec<Url> = pipeline
        .discover_pages(&server.uri(), 15)
        .await
        .unwrap()
        .iter()
        .map(|u| Url::parse(u).unwrap())
        .collect();

    let fetcher = Arc::new(HttpFetcher::new(&UserAgentConfig::default()).unwrap());
    let pages = ConcurrentFetcher::new(fetcher, Arc::new(RateLimiter::new(Duration::ZERO)))
        .with_batch_pause(Duration::ZERO)
        .with_page_timeout(Duration::from_secs(5))
        .fetch_all(&urls)
        .await;

    let fetched: HashSet<String> = pages.iter().map(|p| p.url.clone()).collect();
    let expected: HashSet<String> = [
        format!("{}/", server.uri()),
        format!("{}/about", server.uri()),
    ]
    .into_iter()
    .collect();

    assert_eq!(fetched, expected);
    let about = pages.iter().find(|p| p.url.ends_with("/about")).unwrap();
    assert_eq!(about.title, "About Acme");
    assert!(about.text_content.contains("Founded in 1999"));
}

#[tokio::test]
async fn test_sitemap_entries_become_candidates() {
    let server = acme_site().await;
    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>{uri}/case-studies/steelworks</loc></url>
          <url><loc>{uri}/blog/launch</loc></url>
          <url><loc>{uri}/internal/report</loc></url>
        </urlset>"#,
        uri = server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /internal/\nSitemap: {}/sitemap-main.xml\n",
            server.uri()
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-main.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap))
        .mount(&server)
        .await;

    let pipeline = test_pipeline(test_config(&server.uri()));
    let candidates = pipeline
        .discover_candidates(&server.uri(), 30)
        .await
        .unwrap();

    let steelworks = candidates
        .iter()
        .find(|c| c.url.ends_with("/case-studies/steelworks"))
        .expect("sitemap entry should be a candidate");
    assert_eq!(steelworks.discovered_via, DiscoveredVia::Sitemap);
    assert!(candidates.iter().any(|c| c.url.ends_with("/blog/launch")));
    assert!(!candidates.iter().any(|c| c.url.contains("/internal/")));
}
