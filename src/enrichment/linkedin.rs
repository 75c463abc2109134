//! Professional-network page parsing and failure classification
//!
//! Only the public, logged-out markup is read. Anything behind a login wall
//! simply comes back empty.

use crate::enrichment::record::{
    Activity, CompanyPost, Education, Experience, LinkedInCompanyData, ProfileData,
};
use crate::fetcher::html::{collapse_whitespace, truncate_chars};
use crate::fetcher::FetchedHtml;
use crate::FetchError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Markers of an anti-automation interstitial on company pages
const COMPANY_CHALLENGE_MARKERS: &[&str] = &["challenge-page"];

/// Markers of an anti-automation interstitial on profile pages
const PROFILE_CHALLENGE_MARKERS: &[&str] = &["challenge-page", "security-challenge"];

/// Markers of a missing or private profile
const PROFILE_NOT_FOUND_MARKERS: &[&str] = &["Page not found", "This profile was not found"];

const MAX_COMPANY_POSTS: usize = 2;
const COMPANY_POST_CHARS: usize = 150;
const MAX_PROFILE_ACTIVITY: usize = 3;
const PROFILE_ACTIVITY_CHARS: usize = 200;

static FOLLOWERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,]+)\s+followers").expect("followers regex"));

/// Classifies a company-page response
///
/// Body markers are checked before the status code, since challenge pages
/// are often served with a non-2xx status.
pub fn classify_company_response(url: &str, response: &FetchedHtml) -> Result<(), FetchError> {
    if contains_any(&response.html, COMPANY_CHALLENGE_MARKERS) {
        return Err(FetchError::AntiBot {
            url: url.to_string(),
        });
    }
    ensure_success(url, response)
}

/// Classifies a profile-page response: challenge, then not-found, then status
pub fn classify_profile_response(url: &str, response: &FetchedHtml) -> Result<(), FetchError> {
    if contains_any(&response.html, PROFILE_CHALLENGE_MARKERS) {
        return Err(FetchError::AntiBot {
            url: url.to_string(),
        });
    }
    if contains_any(&response.html, PROFILE_NOT_FOUND_MARKERS) {
        return Err(FetchError::NotFound {
            url: url.to_string(),
        });
    }
    ensure_success(url, response)
}

fn ensure_success(url: &str, response: &FetchedHtml) -> Result<(), FetchError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        })
    }
}

fn contains_any(html: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| html.contains(m))
}

/// Parses a public company page
pub fn parse_company_page(html: &str) -> LinkedInCompanyData {
    let document = Html::parse_document(html);

    let followers_text = select_all_text(&document, ".org-top-card-summary-info-list__info-item");
    let followers = FOLLOWERS_RE
        .captures(&followers_text)
        .and_then(|c| c[1].replace(',', "").parse::<u64>().ok());

    let recent_posts = select(&document, ".feed-shared-update-v2")
        .into_iter()
        .take(MAX_COMPANY_POSTS)
        .filter_map(|post| {
            let content = child_text(post, ".feed-shared-text")?;
            Some(CompanyPost {
                content: truncate_chars(&content, COMPANY_POST_CHARS),
                date: post_date(post),
            })
        })
        .collect();

    LinkedInCompanyData {
        followers,
        industry: first_text(&document, ".org-top-card-summary__industry"),
        company_size: first_text(&document, ".org-about-us-organization-description__text"),
        recent_posts,
    }
}

/// Parses a public profile page
pub fn parse_profile(html: &str) -> ProfileData {
    let document = Html::parse_document(html);

    let headline = first_text(&document, "div.top-card-layout__headline")
        .or_else(|| first_text(&document, "h2.top-card-layout__headline"));

    let summary = first_text(&document, ".pv-about__summary-text")
        .or_else(|| first_text(&document, ".summary-section .pv-about-empty-state"));

    let experience = select(&document, ".experience-section .pv-entity__summary-info")
        .into_iter()
        .filter_map(|entry| {
            let title = child_text(entry, "h3")?;
            let company = child_text(entry, ".pv-entity__secondary-title")?;
            Some(Experience {
                title,
                company,
                duration: child_text(entry, ".pv-entity__bullet-item-v2"),
            })
        })
        .collect();

    let education = select(&document, ".education-section .pv-education-entity")
        .into_iter()
        .filter_map(|entry| {
            let school = child_text(entry, ".pv-entity__school-name")
                .or_else(|| child_text(entry, "h3"))?;
            Some(Education {
                school,
                degree: child_text(entry, ".pv-entity__degree-name .pv-entity__comma-item"),
            })
        })
        .collect();

    let skills = select(&document, ".skills-section .pv-skill-category-entity__name span")
        .into_iter()
        .map(element_text)
        .filter(|s| !s.is_empty())
        .collect();

    let recent_activity = select(&document, ".feed-shared-update-v2")
        .into_iter()
        .take(MAX_PROFILE_ACTIVITY)
        .filter_map(|post| {
            let content = child_text(post, ".feed-shared-text")?;
            Some(Activity {
                content: truncate_chars(&content, PROFILE_ACTIVITY_CHARS),
                date: post_date(post),
            })
        })
        .collect();

    ProfileData {
        headline,
        summary,
        experience,
        education,
        skills,
        recent_activity,
    }
}

fn select<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => document.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    select(document, selector)
        .into_iter()
        .map(element_text)
        .find(|s| !s.is_empty())
}

fn select_all_text(document: &Html, selector: &str) -> String {
    select(document, selector)
        .into_iter()
        .map(element_text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn child_text(element: ElementRef, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    element
        .select(&sel)
        .map(element_text)
        .find(|s| !s.is_empty())
}

/// `<time datetime>` when present, else the element's text
fn post_date(post: ElementRef) -> Option<String> {
    let sel = Selector::parse("time").ok()?;
    let time = post.select(&sel).next()?;
    time.value()
        .attr("datetime")
        .map(str::to_string)
        .or_else(|| Some(element_text(time)))
        .filter(|s| !s.is_empty())
}
