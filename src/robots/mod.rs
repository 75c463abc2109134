//! Robots.txt handling module
//!
//! Fetches and parses a site's robots.txt for its sitemap directives and
//! for filtering discovered links our user agent may not request.

mod parser;

pub use parser::ParsedRobots;

use crate::fetcher::PageFetcher;
use std::time::Duration;
use url::Url;

/// Fetches robots.txt for a site origin
///
/// Any failure (network, non-2xx, timeout) yields an allow-all result with
/// no sitemaps; robots.txt is advisory input to discovery, never fatal.
///
/// # Arguments
///
/// * `fetcher` - Fetch capability used for the request
/// * `site` - Any URL on the site; only its origin is used
/// * `timeout` - Per-request timeout
pub async fn fetch_robots(fetcher: &dyn PageFetcher, site: &Url, timeout: Duration) -> ParsedRobots {
    let robots_url = match site.join("/robots.txt") {
        Ok(url) => url,
        Err(_) => return ParsedRobots::allow_all(),
    };

    match fetcher.fetch(&robots_url, timeout).await {
        Ok(response) => {
            let robots = ParsedRobots::from_content(&response.html);
            tracing::debug!(
                "Fetched {} ({} sitemap directives)",
                robots_url,
                robots.sitemaps().len()
            );
            robots
        }
        Err(e) => {
            tracing::debug!("No robots.txt at {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
