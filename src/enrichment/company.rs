//! Company website parsing: description and technology fingerprints

use crate::fetcher::html::{extract_meta, extract_title};
use scraper::Html;

/// Substring fingerprints (matched against lowercased HTML) and the
/// technology each one indicates
const TECH_SIGNATURES: &[(&[&str], &str)] = &[
    (&["wp-content", "wordpress"], "WordPress"),
    (&["shopify"], "Shopify"),
    (&["react"], "React"),
    (&["angular"], "Angular"),
    (&["vue"], "Vue.js"),
    (&["gatsby"], "Gatsby"),
    (&["next"], "Next.js"),
    (&["hubspot"], "HubSpot"),
    (&["salesforce"], "Salesforce"),
    (&["stripe"], "Stripe"),
    (&["paypal"], "PayPal"),
    (&["google-analytics", "gtag"], "Google Analytics"),
    (&["intercom"], "Intercom"),
    (&["zendesk"], "Zendesk"),
];

/// Description and tech hints read from a company homepage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanySite {
    pub description: Option<String>,
    pub tech_stack_hints: Vec<String>,
}

/// Parses a company homepage
///
/// The description falls back from `meta[name=description]` to
/// `og:description` to the page title.
pub fn parse_company_site(html: &str) -> CompanySite {
    let document = Html::parse_document(html);

    let description = extract_meta(&document, r#"meta[name="description"]"#)
        .or_else(|| extract_meta(&document, r#"meta[property="og:description"]"#))
        .or_else(|| extract_title(&document));

    CompanySite {
        description,
        tech_stack_hints: detect_technologies(html),
    }
}

/// Case-insensitive substring scan against the signature table, in table order
pub fn detect_technologies(html: &str) -> Vec<String> {
    let lower = html.to_lowercase();

    TECH_SIGNATURES
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_prefers_meta() {
        let site = parse_company_site(
            r#"<html><head>
                <title>Acme</title>
                <meta property="og:description" content="OG text">
                <meta name="description" content="Meta text">
            </head></html>"#,
        );
        assert_eq!(site.description.as_deref(), Some("Meta text"));
    }

    #[test]
    fn test_description_falls_back_to_og_then_title() {
        let site = parse_company_site(
            r#"<head><title>Acme</title><meta property="og:description" content="OG text"></head>"#,
        );
        assert_eq!(site.description.as_deref(), Some("OG text"));

        let site = parse_company_site("<head><title> Acme Corp </title></head>");
        assert_eq!(site.description.as_deref(), Some("Acme Corp"));

        let site = parse_company_site("<body>No head</body>");
        assert_eq!(site.description, None);
    }

    #[test]
    fn test_detect_technologies() {
        let html = r#"<link href="/wp-content/themes/x.css">
            <script src="https://js.Stripe.com/v3"></script>
            <script async src="https://www.googletagmanager.com/gtag/js"></script>
            <script src="https://widget.intercom.io/widget/abc"></script>"#;

        assert_eq!(
            detect_technologies(html),
            vec!["WordPress", "Stripe", "Google Analytics", "Intercom"]
        );
    }

    #[test]
    fn test_detect_nothing() {
        assert!(detect_technologies("<p>plain page</p>").is_empty());
    }
}
