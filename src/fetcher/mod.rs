//! Page retrieval and normalization
//!
//! # Components
//!
//! - `PageFetcher`: the fetch capability (one GET with a timeout)
//! - `HttpFetcher`: the `reqwest` implementation
//! - `ConcurrentFetcher`: bounded-concurrency batch fetching with politeness
//!   pauses, producing normalized `FetchedPage`s
//! - `html`: title, meta, link and visible-text extraction

mod concurrent;
pub mod html;
mod http;

pub use concurrent::ConcurrentFetcher;
pub use http::{build_http_client, HttpFetcher};

use crate::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Raw response of a single page request
#[derive(Debug, Clone)]
pub struct FetchedHtml {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub html: String,
    /// Page title, when the body carried one
    pub title: Option<String>,
}

impl FetchedHtml {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A page whose text survived normalization and the noise filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    pub text_content: String,
    pub fetched_at: DateTime<Utc>,
}

/// Fetch capability used for robots.txt, sitemaps, site pages and
/// auxiliary sources
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs one GET and returns the response whatever its status
    ///
    /// Fails only on transport errors and timeouts.
    async fn get(&self, url: &Url, timeout: Duration) -> Result<FetchedHtml, FetchError>;

    /// Like `get`, but non-2xx responses become `FetchError::Status`
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedHtml, FetchError> {
        let response = self.get(url, timeout).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response)
    }
}
