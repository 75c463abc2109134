//! Headline lookup against a NewsAPI-compatible endpoint

use crate::config::NewsConfig;
use crate::enrichment::record::Headline;
use crate::url::extract_domain;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    url: Option<String>,
}

/// Best-effort headline client
///
/// Without an API key every lookup is a no-op returning no headlines.
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl NewsClient {
    pub fn from_config(config: &NewsConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            page_size: config.page_size,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Rate-limiter key of the lookup endpoint
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.base_url)
            .ok()
            .and_then(|url| extract_domain(&url))
    }

    /// Fetches recent headlines mentioning `domain`
    ///
    /// The key travels in the `X-Api-Key` header so request errors, whose
    /// text includes the URL, never carry it.
    ///
    /// # Returns
    ///
    /// * `Ok(vec![])` - No API key configured; nothing was requested
    pub async fn headlines(
        &self,
        domain: &str,
        timeout: Duration,
    ) -> Result<Vec<Headline>, reqwest::Error> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("No news API key configured, skipping lookup for {}", domain);
            return Ok(Vec::new());
        };

        let page_size = self.page_size.to_string();
        let response: EverythingResponse = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .query(&[("q", domain), ("pageSize", page_size.as_str())])
            .header(API_KEY_HEADER, api_key)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .articles
            .into_iter()
            .filter_map(|a| match (a.title, a.url) {
                (Some(title), Some(url)) if !title.trim().is_empty() => Some(Headline {
                    title: title.trim().to_string(),
                    url,
                }),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str, api_key: Option<&str>) -> NewsClient {
        let config = NewsConfig {
            base_url: base_url.to_string(),
            page_size: 3,
            api_key: api_key.map(str::to_string),
        };
        NewsClient::from_config(&config, Client::new())
    }

    #[tokio::test]
    async fn test_headlines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "acme.test"))
            .and(query_param("pageSize", "3"))
            .and(header("X-Api-Key", "news-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "articles": [
                    {"title": "Acme opens plant", "url": "https://news.test/1"},
                    {"title": null, "url": "https://news.test/2"},
                    {"title": "Acme hires", "url": "https://news.test/3"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let headlines = client(&server.uri(), Some("news-key"))
            .headlines("acme.test", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Acme opens plant");
        assert_eq!(headlines[1].url, "https://news.test/3");
    }

    #[tokio::test]
    async fn test_no_key_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let news = client(&server.uri(), Some("  "));
        assert!(!news.is_enabled());
        let headlines = news
            .headlines("acme.test", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(headlines.is_empty());
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server.uri(), Some("secret-news-key"))
            .headlines("acme.test", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
        assert!(!err.to_string().contains("secret-news-key"));
    }
}
