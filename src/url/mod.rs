//! URL handling module
//!
//! This module provides seed normalization, host extraction for rate
//! limiting, the relevance filter applied to discovered links and the
//! priority table used to rank candidate pages.

mod domain;
mod filter;
mod normalize;
mod priority;

// Re-export main functions
pub use domain::{extract_domain, is_same_origin};
pub use filter::is_relevant;
pub use normalize::{has_tracking_params, normalize_seed};
pub use priority::{priority_score, DEFAULT_PRIORITY, HOMEPAGE_PRIORITY, SEED_PATHS};

use crate::UrlError;
use url::Url;

/// Parses an absolute HTTP(S) URL, returning the host key used by the
/// rate limiter alongside it
///
/// # Examples
///
/// ```
/// use site_intel::url::parse_with_host;
///
/// let (url, host) = parse_with_host("https://www.acme.test/about").unwrap();
/// assert_eq!(url.path(), "/about");
/// assert_eq!(host, "acme.test");
/// ```
pub fn parse_with_host(raw: &str) -> Result<(Url, String), UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = extract_domain(&url).ok_or(UrlError::MissingDomain)?;
    Ok((url, host))
}
