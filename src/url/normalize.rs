use crate::UrlError;
use url::Url;

/// Tracking query parameters; a URL carrying any of them is a duplicate
/// variant of a page we already know about
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "mc_eid", "mc_cid", "msclkid", "_hsenc", "_hsmi", "ref",
];

/// Normalizes user-supplied seed input into an absolute site URL
///
/// # Normalization Steps
///
/// 1. Trim whitespace; reject empty input or input containing spaces
/// 2. Strip trailing slashes
/// 3. If no scheme is present, add `https://` (or `http://` for localhost
///    and private-network addresses)
/// 4. Upgrade `http://` to `https://` for public hosts
/// 5. Require a host containing a dot (or localhost / an IP address)
///
/// # Examples
///
/// ```
/// use site_intel::url::normalize_seed;
///
/// let url = normalize_seed("acme.test/").unwrap();
/// assert_eq!(url.as_str(), "https://acme.test/");
/// ```
pub fn normalize_seed(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Malformed("URL cannot be empty".to_string()));
    }

    if trimmed.contains(char::is_whitespace) {
        return Err(UrlError::Malformed(format!(
            "URL cannot contain spaces: \"{}\"",
            trimmed
        )));
    }

    let trimmed = trimmed.trim_end_matches('/');
    let has_scheme = trimmed.contains("://");

    let candidate = if has_scheme {
        trimmed.to_string()
    } else if is_local_host(host_part(trimmed)) {
        format!("http://{}", trimmed)
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?.to_lowercase();

    if !host.contains('.') && !is_local_host(&host) {
        return Err(UrlError::Malformed(format!(
            "URL must include a domain: \"{}\"",
            input.trim()
        )));
    }

    if url.scheme() == "http" && !is_local_host(&host) {
        url.set_scheme("https")
            .map_err(|_| UrlError::Malformed(format!("cannot upgrade {} to https", url)))?;
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns true if the URL carries a tracking query parameter
pub fn has_tracking_params(url: &Url) -> bool {
    url.query_pairs().any(|(key, _)| is_tracking_param(&key))
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// Host portion of a scheme-less input such as `localhost:3000/path`
fn host_part(input: &str) -> &str {
    let end = input.find(['/', ':', '?']).unwrap_or(input.len());
    &input[..end]
}

/// Localhost and private-network addresses keep plain HTTP
fn is_local_host(host: &str) -> bool {
    if host == "localhost" || host == "127.0.0.1" || host == "[::1]" {
        return true;
    }

    let octets: Vec<u8> = match host
        .split('.')
        .map(|p| p.parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(o) if o.len() == 4 => o,
        _ => return false,
    };

    matches!(
        (octets[0], octets[1]),
        (10, _) | (127, _) | (192, 168) | (172, 16..=31)
    )
}
