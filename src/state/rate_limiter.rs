use crate::url::extract_domain;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Pacing state for one host
#[derive(Debug, Clone)]
pub struct RateLimitEntry {
    pub host: String,

    /// Timestamp of the last request to this host
    pub last_request_at: Option<Instant>,

    /// Number of requests made to this host since the process started
    pub request_count: u32,
}

impl RateLimitEntry {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            last_request_at: None,
            request_count: 0,
        }
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_at?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < interval {
            Some(interval - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was made to this host
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_at = Some(now);
    }
}

/// Per-host minimum-interval limiter shared by the fetcher and the
/// enrichment orchestrator
///
/// Each host has its own lock, held across the wait, so two concurrent
/// callers for the same host are serialized and the second one observes the
/// first one's timestamp. Callers for different hosts never block each other.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    hosts: Mutex<HashMap<String, Arc<Mutex<RateLimitEntry>>>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks until the minimum interval since the last request to `host`
    /// has elapsed, then records the new request
    ///
    /// # Returns
    ///
    /// How long the caller was held back.
    pub async fn wait_for_slot(&self, host: &str) -> Duration {
        let entry = self.entry(host).await;
        let mut entry = entry.lock().await;

        let waited = match entry.time_until_next_request(self.interval, Instant::now()) {
            Some(delay) => {
                tracing::debug!("Rate limiting {}: waiting {:?}", host, delay);
                tokio::time::sleep(delay).await;
                delay
            }
            None => Duration::ZERO,
        };

        entry.record_request(Instant::now());
        waited
    }

    /// Convenience wrapper keyed by the URL's host
    ///
    /// URLs without a host are not paced.
    pub async fn wait_for_url(&self, url: &Url) -> Duration {
        match extract_domain(url) {
            Some(host) => self.wait_for_slot(&host).await,
            None => Duration::ZERO,
        }
    }

    /// Number of distinct hosts seen so far
    pub async fn tracked_hosts(&self) -> usize {
        self.hosts.lock().await.len()
    }

    /// Snapshot of a host's entry, if any request has been made to it
    pub async fn entry_for(&self, host: &str) -> Option<RateLimitEntry> {
        let entry = self.hosts.lock().await.get(host).cloned()?;
        let entry = entry.lock().await;
        Some(entry.clone())
    }

    async fn entry(&self, host: &str) -> Arc<Mutex<RateLimitEntry>> {
        let mut hosts = self.hosts.lock().await;
        hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(RateLimitEntry::new(host))))
            .clone()
    }
}
