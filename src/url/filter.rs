use crate::url::normalize::has_tracking_params;
use url::Url;

/// Binary and document extensions that never carry page content
const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".exe", ".dmg",
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".mp4", ".mp3", ".xml", ".css", ".js",
];

/// Path segments for legal, account and commerce pages
const EXCLUDED_SEGMENTS: &[&str] = &[
    "/privacy",
    "/terms",
    "/legal",
    "/cookie",
    "/gdpr",
    "/admin",
    "/wp-admin",
    "/login",
    "/signin",
    "/signup",
    "/register",
    "/cart",
    "/checkout",
    "/order",
    "/billing",
];

/// Decides whether a discovered URL is worth fetching for business analysis
///
/// # Exclusions
///
/// - Binary/document extensions (`.pdf`, `.zip`, images, ...)
/// - Legal, privacy, login, cart and checkout paths
/// - URLs with a fragment
/// - Variants carrying tracking parameters (`utm_*`, `gclid`, ...)
///
/// `raw` is the string as found in the page or sitemap; the fragment check
/// runs on it because an empty `#` does not survive parsing.
pub fn is_relevant(raw: &str, url: &Url) -> bool {
    if raw.contains('#') || url.fragment().is_some() {
        return false;
    }

    let path = url.path().to_lowercase();

    if EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return false;
    }

    if EXCLUDED_SEGMENTS.iter().any(|seg| path.contains(seg)) {
        return false;
    }

    !has_tracking_params(url)
}
