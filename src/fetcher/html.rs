//! HTML helpers for page normalization and link extraction
//!
//! This module handles parsing HTML content to extract:
//! - Page title and meta descriptions
//! - Links to follow (from <a> tags)
//! - Visible text with page chrome removed

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements whose text never counts as page content
const STRIPPED_ELEMENTS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe", "nav", "footer", "header",
];

/// Class names of overlay and navigation widgets
const STRIPPED_CLASSES: &[&str] = &[
    "sidebar",
    "menu",
    "navigation",
    "breadcrumb",
    "cookie-banner",
    "popup",
    "modal",
];

/// Main-content containers, preferred over the whole document when present
const CONTENT_SELECTORS: &[&str] = &["main", "[role=\"main\"]", "article"];

/// Extracts the page title from the HTML document
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Title used for a fetched page: `<title>`, then the first `<h1>`, then
/// the last path segment of the URL
pub fn page_title(document: &Html, url: &Url) -> String {
    if let Some(title) = extract_title(document) {
        return title;
    }

    let heading = Selector::parse("h1").ok().and_then(|sel| {
        document
            .select(&sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|s| !s.is_empty())
    });

    heading
        .or_else(|| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Untitled Page".to_string())
}

/// Reads the `content` attribute of the first matching `<meta>` tag
///
/// # Arguments
///
/// * `document` - Parsed HTML document
/// * `selector` - CSS selector, e.g. `meta[name="description"]`
pub fn extract_meta(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .find(|s| !s.is_empty())
}

/// Collects every `<a href>` on the page, resolved against `base_url`
///
/// Returns `(raw_href, absolute_url)` pairs so callers can apply filters
/// that need the original text. `javascript:`, `mailto:`, `tel:` and `data:`
/// links and links with a `download` attribute are skipped.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<(String, Url)> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push((href.trim().to_string(), absolute_url));
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute HTTP(S) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}

/// Visible text of the document with script, style and navigation chrome
/// removed and whitespace collapsed to single spaces
pub fn normalized_text(document: &Html) -> String {
    for selector in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            let text = element_text(container);
            if !text.is_empty() {
                return text;
            }
        }
    }

    element_text(document.root_element())
}

fn element_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    collapse_whitespace(&out)
}

fn is_stripped(el: &scraper::node::Element) -> bool {
    STRIPPED_ELEMENTS.contains(&el.name())
        || el
            .classes()
            .any(|class| STRIPPED_CLASSES.contains(&class.to_ascii_lowercase().as_str()))
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) => {
                if is_stripped(el) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max` characters, appending `...` when cut
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
