//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the pipeline:
//! - Building HTTP clients with an identifying user agent string
//! - GET requests with a per-request timeout
//! - Error classification into `FetchError`

use crate::config::UserAgentConfig;
use crate::fetcher::{FetchedHtml, PageFetcher};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use site_intel::config::UserAgentConfig;
/// use site_intel::fetcher::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `reqwest`-backed fetch capability
///
/// Serves static HTML only; pages that need script execution come back with
/// whatever the server renders.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, url: &Url, timeout: Duration) -> Result<FetchedHtml, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| classify_error(url, e))?;
        let title = crate::fetcher::html::extract_title(&Html::parse_document(&html));

        Ok(FetchedHtml {
            final_url,
            status,
            html,
            title,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<FetchedHtml, FetchError> {
        tracing::debug!("GET {}", url);

        match tokio::time::timeout(timeout, self.send(url, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }
}

/// Maps a `reqwest` error onto the fetch failure taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "connection refused".to_string(),
        }
    } else if error.is_redirect() {
        FetchError::Network {
            url: url.to_string(),
            message: format!("too many redirects (max {})", MAX_REDIRECTS),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&UserAgentConfig::default()).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&UserAgentConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success_extracts_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><head><title>About Acme</title></head></html>"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/about", server.uri())).unwrap();
        let page = fetcher().fetch(&url, Duration::from_secs(5)).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.title.as_deref(), Some("About Acme"));
    }

    #[tokio::test]
    async fn test_get_returns_body_for_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Page not found"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let page = fetcher().get(&url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(page.status, 404);
        assert!(page.html.contains("Page not found"));

        let err = fetcher().fetch(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let err = fetcher()
            .fetch(&url, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher().fetch(&url, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Network { .. } | FetchError::Timeout { .. }
        ));
    }
}
