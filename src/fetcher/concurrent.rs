use crate::fetcher::html::{normalized_text, page_title};
use crate::fetcher::{FetchedPage, PageFetcher};
use crate::state::RateLimiter;
use chrono::Utc;
use futures::future::join_all;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fetches URL lists in fixed-size batches
///
/// Within a batch every fetch runs concurrently and the whole batch is
/// awaited before the next one starts, so at most `concurrency` requests are
/// ever in flight. Failed pages are logged and dropped; they never fail the
/// batch.
pub struct ConcurrentFetcher {
    fetcher: Arc<dyn PageFetcher>,
    rate_limiter: Arc<RateLimiter>,
    concurrency: usize,
    batch_pause: Duration,
    page_timeout: Duration,
    min_page_chars: usize,
}

impl ConcurrentFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            fetcher,
            rate_limiter,
            concurrency: 3,
            batch_pause: Duration::from_millis(500),
            page_timeout: Duration::from_secs(30),
            min_page_chars: 100,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_batch_pause(mut self, pause: Duration) -> Self {
        self.batch_pause = pause;
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_min_page_chars(mut self, min: usize) -> Self {
        self.min_page_chars = min;
        self
    }

    /// Fetches and normalizes every URL, returning the pages that succeeded
    /// and passed the noise filter
    ///
    /// Output follows batch order; order inside a batch follows the input.
    pub async fn fetch_all(&self, urls: &[Url]) -> Vec<FetchedPage> {
        let mut pages = Vec::new();
        let batches: Vec<&[Url]> = urls.chunks(self.concurrency).collect();
        let batch_count = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            tracing::debug!(
                "Fetching batch {}/{} ({} pages)",
                index + 1,
                batch_count,
                batch.len()
            );

            let results = join_all(batch.iter().map(|url| self.fetch_one(url))).await;
            pages.extend(results.into_iter().flatten());

            if index + 1 < batch_count && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }
        }

        tracing::info!("Fetched {} usable pages out of {}", pages.len(), urls.len());
        pages
    }

    async fn fetch_one(&self, url: &Url) -> Option<FetchedPage> {
        self.rate_limiter.wait_for_url(url).await;

        let response = match self.fetcher.fetch(url, self.page_timeout).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Skipping {} ({}): {}", url, e.kind(), e);
                return None;
            }
        };

        let document = Html::parse_document(&response.html);
        let text_content = normalized_text(&document);
        let char_count = text_content.chars().count();

        if char_count <= self.min_page_chars {
            tracing::debug!(
                "Dropping {}: {} chars is below the noise threshold",
                url,
                char_count
            );
            return None;
        }

        Some(FetchedPage {
            url: url.to_string(),
            title: response
                .title
                .unwrap_or_else(|| page_title(&document, url)),
            text_content,
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchedHtml;
    use crate::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned bodies and records the peak number of in-flight calls
    struct CountingFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn get(&self, url: &Url, _timeout: Duration) -> Result<FetchedHtml, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.path() == "/broken" {
                return Err(FetchError::Network {
                    url: url.to_string(),
                    message: "connection reset".to_string(),
                });
            }

            let body = if url.path() == "/thin" {
                "<body><p>Too short</p></body>".to_string()
            } else {
                format!(
                    "<html><head><title>{}</title></head><body><p>{}</p></body></html>",
                    url.path(),
                    "Acme builds industrial widgets. ".repeat(10)
                )
            };

            Ok(FetchedHtml {
                final_url: url.clone(),
                status: 200,
                title: Some(url.path().to_string()),
                html: body,
            })
        }
    }

    fn urls(paths: &[&str]) -> Vec<Url> {
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| Url::parse(&format!("https://site{}.test{}", i, p)).unwrap())
            .collect()
    }

    fn fetcher(inner: Arc<CountingFetcher>, concurrency: usize) -> ConcurrentFetcher {
        ConcurrentFetcher::new(inner, Arc::new(RateLimiter::new(Duration::ZERO)))
            .with_concurrency(concurrency)
            .with_batch_pause(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_concurrency() {
        let inner = Arc::new(CountingFetcher::new());
        let fetcher = fetcher(inner.clone(), 3);

        let pages = fetcher
            .fetch_all(&urls(&["/a", "/b", "/c", "/d", "/e", "/f", "/g"]))
            .await;

        assert_eq!(pages.len(), 7);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 7);
        assert!(inner.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_failed_and_thin_pages_are_dropped() {
        let inner = Arc::new(CountingFetcher::new());
        let fetcher = fetcher(inner, 2);

        let pages = fetcher.fetch_all(&urls(&["/", "/broken", "/thin", "/about"])).await;
        let paths: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(paths, vec!["/", "/about"]);
        assert!(pages.iter().all(|p| p.text_content.chars().count() > 100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_host_requests_are_paced() {
        let inner = Arc::new(CountingFetcher::new());
        let fetcher = ConcurrentFetcher::new(
            inner.clone(),
            Arc::new(RateLimiter::new(Duration::from_secs(2))),
        )
        .with_concurrency(3)
        .with_batch_pause(Duration::ZERO);

        let urls: Vec<Url> = ["/", "/about", "/pricing"]
            .iter()
            .map(|p| Url::parse(&format!("https://acme.test{}", p)).unwrap())
            .collect();

        let start = tokio::time::Instant::now();
        let pages = fetcher.fetch_all(&urls).await;

        assert_eq!(pages.len(), 3);
        assert!(start.elapsed() >= Duration::from_secs(4));
        assert_eq!(inner.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_between_batches() {
        let inner = Arc::new(CountingFetcher::new());
        let fetcher = ConcurrentFetcher::new(inner, Arc::new(RateLimiter::new(Duration::ZERO)))
            .with_concurrency(2)
            .with_batch_pause(Duration::from_secs(3));

        let start = tokio::time::Instant::now();
        let pages = fetcher.fetch_all(&urls(&["/a", "/b", "/c", "/d", "/e"])).await;

        assert_eq!(pages.len(), 5);
        // Three batches, two pauses
        assert!(start.elapsed() >= Duration::from_secs(6));
        assert!(start.elapsed() < Duration::from_secs(9));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let inner = Arc::new(CountingFetcher::new());
        let pages = fetcher(inner, 3).fetch_all(&[]).await;
        assert!(pages.is_empty());
    }
}
