use url::Url;

/// Extracts the host from a URL for rate limiting purposes
///
/// The host is lowercased and a leading `www.` is dropped so that
/// `www.acme.test` and `acme.test` share one politeness slot.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_intel::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let host = h.to_lowercase();
        match host.strip_prefix("www.") {
            Some(rest) => rest.to_string(),
            None => host,
        }
    })
}

/// Returns true when both URLs share scheme, host and port
pub fn is_same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
