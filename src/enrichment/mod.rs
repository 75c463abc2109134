//! Company and person enrichment from auxiliary sources
//!
//! `EnrichmentOrchestrator::enrich` walks the company website, the optional
//! company-network page and a headline lookup. Each stage is isolated: a
//! failure lands in the record's `scraping_errors` and the next stage runs.
//! Only malformed input URLs fail the call.
//!
//! `EnrichmentOrchestrator::scrape_profile` is the sibling person-level
//! scrape. It fails loudly with a classified `FetchError` so the caller can
//! decide what to do with the subject.

pub mod company;
pub mod linkedin;
pub mod news;
mod record;

pub use company::{detect_technologies, parse_company_site, CompanySite};
pub use linkedin::{
    classify_company_response, classify_profile_response, parse_company_page, parse_profile,
};
pub use news::NewsClient;
pub use record::{
    Activity, CompanyPost, Education, EnrichmentRecord, Experience, Headline,
    LinkedInCompanyData, ProfileData, Source,
};

use crate::fetcher::PageFetcher;
use crate::state::{SharedState, SubjectKey};
use crate::url::{extract_domain, normalize_seed, parse_with_host};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default timeout for a single auxiliary-source request
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the per-subject enrichment stages against shared rate-limit and
/// cache state
pub struct EnrichmentOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    state: SharedState,
    news: NewsClient,
    request_timeout: Duration,
}

impl EnrichmentOrchestrator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, state: SharedState, news: NewsClient) -> Self {
        Self {
            fetcher,
            state,
            news,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Enriches a company
    ///
    /// # Arguments
    ///
    /// * `website_url` - Company website, normalized like a seed URL
    /// * `linkedin_url` - Optional company-network page; blank means absent
    /// * `refresh` - Skip the cache lookup and overwrite the entry afterwards
    ///
    /// # Errors
    ///
    /// Only `PipelineError::Url` for unusable input URLs. Source failures
    /// are recorded in the returned record.
    pub async fn enrich(
        &self,
        website_url: &str,
        linkedin_url: Option<&str>,
        refresh: bool,
    ) -> Result<EnrichmentRecord> {
        let (website, company_page) = parse_subject(website_url, linkedin_url)?;
        let key = subject_key(&website, company_page.as_ref());

        if !refresh {
            if let Some(cached) = self.state.cache.get(&key).await {
                tracing::debug!("Enrichment cache hit for {}", key);
                return Ok(cached);
            }
        }

        tracing::info!("Enriching {}", website);
        let mut record = EnrichmentRecord::default();

        self.scrape_company_site(&website, &mut record).await;
        if let Some(page) = &company_page {
            self.scrape_company_network(page, &mut record).await;
        }
        self.lookup_news(&website, &mut record).await;

        if !record.scraping_errors.is_empty() {
            tracing::info!(
                "Enrichment of {} finished with {} source failure(s)",
                website,
                record.scraping_errors.len()
            );
        }

        self.state.cache.set(key, record.clone()).await;
        Ok(record)
    }

    /// Cache key the inputs of `enrich` map to
    pub fn subject_key(&self, website_url: &str, linkedin_url: Option<&str>) -> Result<SubjectKey> {
        let (website, company_page) = parse_subject(website_url, linkedin_url)?;
        Ok(subject_key(&website, company_page.as_ref()))
    }

    /// Scrapes a person's public profile page
    ///
    /// # Errors
    ///
    /// * `PipelineError::Url` - `profile_url` is not an absolute HTTP(S) URL
    /// * `PipelineError::Fetch` - `AntiBot`, `NotFound`, `Status`, `Timeout`
    ///   or `Network`
    pub async fn scrape_profile(&self, profile_url: &str, name: &str) -> Result<ProfileData> {
        let (url, _) = parse_with_host(profile_url)?;

        self.state.rate_limiter.wait_for_url(&url).await;
        let response = match self.fetcher.get(&url, self.request_timeout).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Profile scrape for {} failed: {}", name, e);
                return Err(e.into());
            }
        };

        if let Err(e) = classify_profile_response(url.as_str(), &response) {
            tracing::warn!("Profile scrape for {} failed ({}): {}", name, e.kind(), e);
            return Err(e.into());
        }

        let profile = parse_profile(&response.html);
        if profile.is_empty() {
            tracing::debug!("Profile page for {} had no public fields", name);
        }
        Ok(profile)
    }

    async fn scrape_company_site(&self, website: &Url, record: &mut EnrichmentRecord) {
        self.state.rate_limiter.wait_for_url(website).await;

        match self.fetcher.fetch(website, self.request_timeout).await {
            Ok(response) => {
                let site = parse_company_site(&response.html);
                record.description = site.description;
                record.tech_stack_hints = site.tech_stack_hints;
                record.mark_scraped(Source::CompanyWebsite);
            }
            Err(e) => {
                tracing::warn!("Company website scrape failed: {}", e);
                record.record_error(Source::CompanyWebsite, e.to_string());
            }
        }
    }

    async fn scrape_company_network(&self, page: &Url, record: &mut EnrichmentRecord) {
        self.state.rate_limiter.wait_for_url(page).await;

        let result = self
            .fetcher
            .get(page, self.request_timeout)
            .await
            .and_then(|response| {
                classify_company_response(page.as_str(), &response)?;
                Ok(response)
            });

        match result {
            Ok(response) => {
                record.linkedin_company = Some(parse_company_page(&response.html));
                record.mark_scraped(Source::LinkedInCompany);
            }
            Err(e) => {
                tracing::warn!("Company network scrape failed ({}): {}", e.kind(), e);
                record.record_error(Source::LinkedInCompany, e.to_string());
            }
        }
    }

    async fn lookup_news(&self, website: &Url, record: &mut EnrichmentRecord) {
        if !self.news.is_enabled() {
            return;
        }
        let Some(domain) = extract_domain(website) else {
            return;
        };

        if let Some(host) = self.news.host() {
            self.state.rate_limiter.wait_for_slot(&host).await;
        }

        match self.news.headlines(&domain, self.request_timeout).await {
            Ok(headlines) => {
                record.headlines = headlines;
                record.mark_scraped(Source::News);
            }
            Err(e) => {
                tracing::warn!("News lookup for {} failed: {}", domain, e);
                record.record_error(Source::News, e.to_string());
            }
        }
    }
}

fn parse_subject(website_url: &str, linkedin_url: Option<&str>) -> Result<(Url, Option<Url>)> {
    let website = normalize_seed(website_url)?;
    let company_page = match linkedin_url.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_with_host(raw)?.0),
        None => None,
    };
    Ok((website, company_page))
}

fn subject_key(website: &Url, company_page: Option<&Url>) -> SubjectKey {
    SubjectKey::new(website.as_str(), company_page.map(Url::as_str))
}
