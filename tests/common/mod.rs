//! Shared helpers for the wiremock-backed integration tests

#![allow(dead_code)]

use site_intel::config::{Config, UserAgentConfig};
use site_intel::enrichment::NewsClient;
use site_intel::extraction::OpenAiClient;
use site_intel::fetcher::HttpFetcher;
use site_intel::Pipeline;
use std::sync::Arc;

/// Configuration with pacing turned off and every endpoint on `server_uri`
pub fn test_config(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.analysis.batch_pause_ms = 0;
    config.analysis.fetch_timeout_ms = 5_000;
    config.analysis.fast_fetch_timeout_ms = 5_000;
    config.analysis.discovery_budget_ms = 3_000;
    config.politeness.rate_limit_interval_ms = 0;
    config.politeness.subject_delay_ms = 0;
    config.user_agent = UserAgentConfig {
        name: "TestBot".to_string(),
        version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    };
    config.completion.base_url = server_uri.to_string();
    config.completion.api_key = Some("sk-test".to_string());
    config.news.base_url = server_uri.to_string();
    config
}

/// Pipeline on real HTTP components pointed at the mock server
pub fn test_pipeline(config: Config) -> Pipeline {
    let fetcher = Arc::new(HttpFetcher::new(&config.user_agent).expect("http client"));
    let completion = OpenAiClient::from_config(&config.completion)
        .ok()
        .map(|c| Arc::new(c) as Arc<dyn site_intel::CompletionService>);
    let news = NewsClient::from_config(&config.news, reqwest::Client::new());
    Pipeline::with_components(config, fetcher, completion, news)
}

/// A page whose visible text comfortably passes the noise filter
pub fn content_page(title: &str, text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a> "#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><main><h1>{}</h1><p>{}</p><p>{}</p></main></body></html>",
        title,
        title,
        text.repeat(4),
        anchors
    )
}
