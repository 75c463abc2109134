//! Sitemap XML parsing
//!
//! Handles both `<urlset>` documents and `<sitemapindex>` documents. Only
//! `<loc>` values matter here, so a pattern match is enough; malformed
//! files simply yield fewer entries.

use regex::Regex;
use std::sync::LazyLock;

/// Sitemap locations tried when robots.txt declares none
pub const COMMON_SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml", "/sitemap1.xml"];

static URL_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<url(?:\s[^>]*)?>(.*?)</url>").expect("url block regex"));

static SITEMAP_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<sitemap(?:\s[^>]*)?>(.*?)</sitemap>").expect("sitemap block regex")
});

static LOC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<loc>\s*(?:<!\[CDATA\[)?\s*(.*?)\s*(?:\]\]>)?\s*</loc>").expect("loc regex")
});

static INDEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<sitemapindex[\s>]").expect("sitemapindex regex"));

/// Parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sitemap {
    /// Page locations from `<urlset><url><loc>`
    Urls(Vec<String>),
    /// Child sitemap locations from `<sitemapindex><sitemap><loc>`
    Index(Vec<String>),
}

/// Parses a sitemap document
///
/// # Example
///
/// ```
/// use site_intel::discovery::{parse_sitemap, Sitemap};
///
/// let xml = "<urlset><url><loc>https://acme.test/about</loc></url></urlset>";
/// assert_eq!(
///     parse_sitemap(xml),
///     Sitemap::Urls(vec!["https://acme.test/about".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Sitemap {
    if INDEX_RE.is_match(xml) {
        Sitemap::Index(block_locations(&SITEMAP_BLOCK_RE, xml))
    } else {
        Sitemap::Urls(block_locations(&URL_BLOCK_RE, xml))
    }
}

fn block_locations(block_re: &Regex, xml: &str) -> Vec<String> {
    block_re
        .captures_iter(xml)
        .filter_map(|block| {
            let inner = block.get(1)?.as_str();
            let loc = LOC_RE.captures(inner)?.get(1)?.as_str();
            let loc = decode_entities(loc.trim());
            (!loc.is_empty()).then_some(loc)
        })
        .collect()
}

/// Decodes the five predefined XML entities
fn decode_entities(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://acme.test/</loc>
    <lastmod>2024-01-01</lastmod>
  </url>
  <url><loc> https://acme.test/pricing?plan=a&amp;b=c </loc></url>
  <url><loc><![CDATA[https://acme.test/customers]]></loc></url>
  <url><priority>0.5</priority></url>
</urlset>"#;

        assert_eq!(
            parse_sitemap(xml),
            Sitemap::Urls(vec![
                "https://acme.test/".to_string(),
                "https://acme.test/pricing?plan=a&b=c".to_string(),
                "https://acme.test/customers".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_index() {
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://acme.test/pages.xml</loc></sitemap>
  <sitemap><loc>https://acme.test/posts.xml</loc></sitemap>
</sitemapindex>"#;

        assert_eq!(
            parse_sitemap(xml),
            Sitemap::Index(vec![
                "https://acme.test/pages.xml".to_string(),
                "https://acme.test/posts.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_sitemap("<html>not a sitemap</html>"), Sitemap::Urls(vec![]));
    }
}
