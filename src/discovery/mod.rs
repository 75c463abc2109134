//! Page discovery
//!
//! Builds a prioritized list of candidate pages for a site from three
//! sources: fixed path guesses, sitemaps (declared in robots.txt or at the
//! usual locations) and the links on the homepage. The sitemap step and the
//! homepage step each race a wall-clock budget; whatever they collected
//! before the budget ran out is kept.

mod sitemap;

pub use sitemap::{parse_sitemap, Sitemap, COMMON_SITEMAP_PATHS};

use crate::fetcher::{html, PageFetcher};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::{extract_domain, is_relevant, priority_score, SEED_PATHS};
use scraper::Html;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// How a candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveredVia {
    /// The seed URL itself
    Seed,
    /// A fixed high-value path guess
    Guess,
    Sitemap,
    /// A link on the homepage
    Homepage,
}

/// A page worth fetching, with its rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateUrl {
    pub url: String,
    pub priority_score: u32,
    pub discovered_via: DiscoveredVia,
}

/// Deduplicating, insertion-ordered candidate list
struct CandidateSet {
    homepage: Url,
    seen: HashSet<String>,
    candidates: Vec<CandidateUrl>,
}

impl CandidateSet {
    fn new(homepage: &Url) -> Self {
        Self {
            homepage: homepage.clone(),
            seen: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    fn push(&mut self, url: &Url, via: DiscoveredVia) -> bool {
        let key = url.to_string();
        if !self.seen.insert(key.clone()) {
            return false;
        }

        self.candidates.push(CandidateUrl {
            url: key,
            priority_score: priority_score(url, &self.homepage),
            discovered_via: via,
        });
        true
    }

    /// Stable sort by descending priority, then truncate
    fn into_ranked(mut self, max_pages: usize) -> Vec<CandidateUrl> {
        self.candidates
            .sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
        self.candidates.truncate(max_pages.max(1));
        self.candidates
    }
}

/// Candidate page discoverer
pub struct Discoverer {
    fetcher: Arc<dyn PageFetcher>,
    budget: Duration,
    request_timeout: Duration,
    robots_agent: String,
}

impl Discoverer {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            budget: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            robots_agent: "SiteIntel".to_string(),
        }
    }

    /// Wall-clock budget for each of the sitemap and homepage steps
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Product token matched against robots.txt user-agent groups
    pub fn with_robots_agent(mut self, agent: impl Into<String>) -> Self {
        self.robots_agent = agent.into();
        self
    }

    /// Discovers up to `max_pages` candidate URLs for the site at `seed`
    ///
    /// The result always contains the seed URL, is sorted by non-increasing
    /// priority score (ties keep discovery order) and never fails: network
    /// errors in the sitemap and homepage steps are logged and skipped.
    ///
    /// # Arguments
    ///
    /// * `seed` - Normalized site URL (see `url::normalize_seed`)
    /// * `max_pages` - Maximum number of candidates returned (at least 1)
    pub async fn discover(&self, seed: &Url, max_pages: usize) -> Vec<CandidateUrl> {
        let mut candidates = CandidateSet::new(seed);
        candidates.push(seed, DiscoveredVia::Seed);

        for path in SEED_PATHS {
            if let Ok(url) = seed.join(path) {
                candidates.push(&url, DiscoveredVia::Guess);
            }
        }

        let mut robots = ParsedRobots::allow_all();
        let mut sitemap_urls = Vec::new();
        let mut homepage_urls = Vec::new();

        let (sitemap_step, homepage_step) = tokio::join!(
            tokio::time::timeout(
                self.budget,
                self.collect_from_sitemaps(seed, &mut robots, &mut sitemap_urls)
            ),
            tokio::time::timeout(
                self.budget,
                self.collect_from_homepage(seed, &mut homepage_urls)
            ),
        );

        if sitemap_step.is_err() {
            tracing::warn!(
                "Sitemap discovery for {} exceeded {:?}, keeping {} URLs found so far",
                seed,
                self.budget,
                sitemap_urls.len()
            );
        }
        if homepage_step.is_err() {
            tracing::warn!(
                "Homepage link discovery for {} exceeded {:?}, keeping {} URLs found so far",
                seed,
                self.budget,
                homepage_urls.len()
            );
        }

        let mut disallowed = 0;
        for (urls, via) in [
            (sitemap_urls, DiscoveredVia::Sitemap),
            (homepage_urls, DiscoveredVia::Homepage),
        ] {
            for url in urls {
                if robots.is_allowed(url.as_str(), &self.robots_agent) {
                    candidates.push(&url, via);
                } else {
                    disallowed += 1;
                }
            }
        }

        if disallowed > 0 {
            tracing::debug!("Dropped {} candidates disallowed by robots.txt", disallowed);
        }

        let ranked = candidates.into_ranked(max_pages);
        tracing::info!("Discovered {} candidate pages for {}", ranked.len(), seed);
        ranked
    }

    /// robots.txt sitemaps first; the common locations when those yield nothing
    async fn collect_from_sitemaps(
        &self,
        seed: &Url,
        robots: &mut ParsedRobots,
        found: &mut Vec<Url>,
    ) {
        *robots = fetch_robots(self.fetcher.as_ref(), seed, self.request_timeout).await;

        let declared: Vec<String> = robots.sitemaps().to_vec();
        for location in &declared {
            if let Ok(url) = Url::parse(location) {
                self.read_sitemap(&url, seed, found).await;
            }
        }

        if !found.is_empty() {
            return;
        }

        for path in COMMON_SITEMAP_PATHS {
            if let Ok(url) = seed.join(path) {
                if declared.iter().any(|d| d == url.as_str()) {
                    continue;
                }
                self.read_sitemap(&url, seed, found).await;
            }
        }
    }

    /// Reads one sitemap, following an index one level down
    async fn read_sitemap(&self, location: &Url, seed: &Url, found: &mut Vec<Url>) {
        let locations = match self.load_sitemap(location).await {
            Some(Sitemap::Urls(locations)) => locations,
            Some(Sitemap::Index(children)) => {
                let mut locations = Vec::new();
                for child in children.iter().filter_map(|c| Url::parse(c).ok()) {
                    match self.load_sitemap(&child).await {
                        Some(Sitemap::Urls(child_locations)) => locations.extend(child_locations),
                        Some(Sitemap::Index(_)) => {
                            tracing::debug!("Ignoring nested sitemap index {}", child);
                        }
                        None => {}
                    }
                }
                locations
            }
            None => return,
        };

        let before = found.len();
        for raw in locations {
            if let Some(url) = relevant_same_site(&raw, None, seed) {
                found.push(url);
            }
        }
        tracing::debug!(
            "Sitemap {} contributed {} URLs",
            location,
            found.len() - before
        );
    }

    async fn load_sitemap(&self, location: &Url) -> Option<Sitemap> {
        match self.fetcher.fetch(location, self.request_timeout).await {
            Ok(response) => Some(parse_sitemap(&response.html)),
            Err(e) => {
                tracing::debug!("Sitemap {} unavailable: {}", location, e);
                None
            }
        }
    }

    async fn collect_from_homepage(&self, seed: &Url, found: &mut Vec<Url>) {
        let response = match self.fetcher.fetch(seed, self.request_timeout).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Could not crawl homepage {} for links: {}", seed, e);
                return;
            }
        };

        let links = {
            let document = Html::parse_document(&response.html);
            html::extract_links(&document, &response.final_url)
        };

        for (raw, url) in links {
            if let Some(url) = relevant_same_site(&raw, Some(url), seed) {
                found.push(url);
            }
        }
    }
}

/// Parses (when needed) and keeps a URL that is on the seed's site and
/// passes the relevance filter
fn relevant_same_site(raw: &str, resolved: Option<Url>, seed: &Url) -> Option<Url> {
    let url = match resolved {
        Some(url) => url,
        None => Url::parse(raw).ok()?,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    if extract_domain(&url)? != extract_domain(seed)? {
        return None;
    }

    is_relevant(raw, &url).then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchedHtml;
    use crate::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Serves a fixed path → body map; everything else is a 404
    struct MapFetcher {
        pages: HashMap<String, String>,
        delay: Duration,
    }

    impl MapFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(p, b)| (p.to_string(), b.to_string()))
                    .collect(),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn get(&self, url: &Url, _timeout: Duration) -> Result<FetchedHtml, FetchError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let (status, html) = match self.pages.get(url.path()) {
                Some(body) => (200, body.clone()),
                None => (404, String::new()),
            };
            Ok(FetchedHtml {
                final_url: url.clone(),
                status,
                html,
                title: None,
            })
        }
    }

    fn seed() -> Url {
        Url::parse("https://acme.test/").unwrap()
    }

    #[tokio::test]
    async fn test_seed_set_without_network() {
        let discoverer = Discoverer::new(Arc::new(MapFetcher::new(&[])));
        let candidates = discoverer.discover(&seed(), 100).await;

        assert_eq!(candidates[0].url, "https://acme.test/");
        assert_eq!(candidates[0].priority_score, 100);
        assert_eq!(candidates[0].discovered_via, DiscoveredVia::Seed);
        assert_eq!(candidates.len(), SEED_PATHS.len() + 1);
        assert!(candidates
            .windows(2)
            .all(|w| w[0].priority_score >= w[1].priority_score));
    }

    #[tokio::test]
    async fn test_truncates_and_keeps_seed() {
        let discoverer = Discoverer::new(Arc::new(MapFetcher::new(&[])));

        let candidates = discoverer.discover(&seed(), 3).await;
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].url, "https://acme.test/");
        // Stable: /about precedes /about-us and /company
        assert_eq!(candidates[1].url, "https://acme.test/about");

        let candidates = discoverer.discover(&seed(), 0).await;
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_homepage_links_are_filtered() {
        let homepage = r#"<html><body>
            <a href="/blog/launch">Launch</a>
            <a href="/privacy">Privacy</a>
            <a href="/about">About again</a>
            <a href="https://elsewhere.test/partners">Partners</a>
            <a href="/whitepaper.pdf">PDF</a>
            <a href="/team?utm_source=nav">Team</a>
        </body></html>"#;
        let discoverer = Discoverer::new(Arc::new(MapFetcher::new(&[("/", homepage)])));

        let candidates = discoverer.discover(&seed(), 100).await;
        let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();

        assert!(urls.contains(&"https://acme.test/blog/launch"));
        assert!(!urls.iter().any(|u| u.contains("privacy")));
        assert!(!urls.iter().any(|u| u.contains("elsewhere")));
        assert!(!urls.iter().any(|u| u.ends_with(".pdf")));
        assert!(!urls.iter().any(|u| u.contains("utm_")));
        assert_eq!(urls.iter().filter(|u| **u == "https://acme.test/about").count(), 1);

        let blog = candidates
            .iter()
            .find(|c| c.url == "https://acme.test/blog/launch")
            .unwrap();
        assert_eq!(blog.discovered_via, DiscoveredVia::Homepage);
        assert_eq!(blog.priority_score, 60);
    }

    #[tokio::test]
    async fn test_robots_sitemap_and_disallow() {
        let robots = "User-agent: *\nDisallow: /internal\nSitemap: https://acme.test/index.xml\n";
        let index = r#"<sitemapindex><sitemap><loc>https://acme.test/pages.xml</loc></sitemap></sitemapindex>"#;
        let pages = r#"<urlset>
            <url><loc>https://acme.test/reviews</loc></url>
            <url><loc>https://acme.test/internal/roadmap</loc></url>
            <url><loc>https://acme.test/terms</loc></url>
        </urlset>"#;

        let discoverer = Discoverer::new(Arc::new(MapFetcher::new(&[
            ("/robots.txt", robots),
            ("/index.xml", index),
            ("/pages.xml", pages),
        ])));

        let candidates = discoverer.discover(&seed(), 100).await;
        let reviews = candidates
            .iter()
            .find(|c| c.url == "https://acme.test/reviews")
            .unwrap();

        assert_eq!(reviews.discovered_via, DiscoveredVia::Sitemap);
        assert!(!candidates.iter().any(|c| c.url.contains("internal")));
        assert!(!candidates.iter().any(|c| c.url.contains("terms")));
    }

    #[tokio::test]
    async fn test_common_sitemap_fallback() {
        let sitemap = r#"<urlset><url><loc>https://acme.test/resources/guide</loc></url></urlset>"#;
        let discoverer = Discoverer::new(Arc::new(MapFetcher::new(&[("/sitemap.xml", sitemap)])));

        let candidates = discoverer.discover(&seed(), 100).await;
        assert!(candidates
            .iter()
            .any(|c| c.url == "https://acme.test/resources/guide"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_steps_are_abandoned() {
        let mut fetcher = MapFetcher::new(&[("/", r#"<a href="/blog">Blog</a>"#)]);
        fetcher.delay = Duration::from_secs(60);

        let discoverer = Discoverer::new(Arc::new(fetcher))
            .with_budget(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(120));

        let start = tokio::time::Instant::now();
        let candidates = discoverer.discover(&seed(), 100).await;

        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(candidates.len(), SEED_PATHS.len() + 1);
    }
}
