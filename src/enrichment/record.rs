use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Auxiliary source scraped during enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    CompanyWebsite,
    LinkedInCompany,
    LinkedInProfile,
    News,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::CompanyWebsite => "company website",
            Source::LinkedInCompany => "company network page",
            Source::LinkedInProfile => "profile page",
            Source::News => "news",
        };
        f.write_str(name)
    }
}

/// Partial-tolerant enrichment of one subject
///
/// Each source either contributes its fields and a `scraped_at` timestamp,
/// or leaves an entry in `scraping_errors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentRecord {
    pub description: Option<String>,
    pub tech_stack_hints: Vec<String>,
    pub linkedin_company: Option<LinkedInCompanyData>,
    pub lead_profile: Option<ProfileData>,
    pub headlines: Vec<Headline>,
    pub scraping_errors: BTreeMap<Source, String>,
    pub scraped_at: BTreeMap<Source, DateTime<Utc>>,
}

impl EnrichmentRecord {
    pub fn record_error(&mut self, source: Source, message: impl Into<String>) {
        self.scraping_errors.insert(source, message.into());
    }

    pub fn mark_scraped(&mut self, source: Source) {
        self.scraped_at.insert(source, Utc::now());
    }

    pub fn has_error(&self, source: Source) -> bool {
        self.scraping_errors.contains_key(&source)
    }

    /// Copy without the person-level profile fields
    ///
    /// Stored enrichment entries are keyed by company and hold no lead data.
    pub fn company_only(&self) -> Self {
        let mut record = self.clone();
        record.lead_profile = None;
        record.scraping_errors.remove(&Source::LinkedInProfile);
        record.scraped_at.remove(&Source::LinkedInProfile);
        record
    }
}

/// Public company-network page data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInCompanyData {
    pub followers: Option<u64>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub recent_posts: Vec<CompanyPost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyPost {
    pub content: String,
    pub date: Option<String>,
}

/// Public profile page data of a person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub recent_activity: Vec<Activity>,
}

impl ProfileData {
    /// True when the page parsed but yielded no profile fields
    pub fn is_empty(&self) -> bool {
        self.headline.is_none()
            && self.summary.is_none()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.recent_activity.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub degree: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub content: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub url: String,
}
