use crate::batch::stats::BatchStats;
use crate::enrichment::{EnrichmentOrchestrator, EnrichmentRecord, Source};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One company/person to enrich
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub website_url: String,

    /// Public profile page of the person
    #[serde(default)]
    pub linkedin_url: Option<String>,

    /// Company-network page of the company
    #[serde(default)]
    pub company_linkedin_url: Option<String>,
}

impl Subject {
    fn profile_url(&self) -> Option<&str> {
        non_blank(self.linkedin_url.as_deref())
    }

    fn company_page_url(&self) -> Option<&str> {
        non_blank(self.company_linkedin_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Outcome for one subject
///
/// `record` always holds whatever was obtained, including profile data and
/// per-source errors. `error` is set only when enrichment itself failed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub subject: Subject,
    pub record: EnrichmentRecord,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub items: Vec<BatchItem>,
    pub stats: BatchStats,
}

/// Sequential enrichment of many subjects
pub struct BatchRunner {
    orchestrator: Arc<EnrichmentOrchestrator>,
    subject_delay: Duration,
}

impl BatchRunner {
    pub fn new(orchestrator: Arc<EnrichmentOrchestrator>) -> Self {
        Self {
            orchestrator,
            subject_delay: Duration::from_secs(1),
        }
    }

    pub fn with_subject_delay(mut self, delay: Duration) -> Self {
        self.subject_delay = delay;
        self
    }

    /// Runs every subject in order
    ///
    /// # Arguments
    ///
    /// * `subjects` - Subjects to enrich, one at a time
    /// * `on_progress` - Called after each subject with
    ///   `(processed, total, failed)`
    ///
    /// A subject's failure is recorded and the run moves on.
    pub async fn run<F>(&self, subjects: &[Subject], mut on_progress: F) -> BatchResult
    where
        F: FnMut(usize, usize, usize),
    {
        let total = subjects.len();
        let mut stats = BatchStats::new(total);
        let mut items = Vec::with_capacity(total);

        tracing::info!("Starting batch of {} subjects", total);

        for (index, subject) in subjects.iter().enumerate() {
            if index > 0 && !self.subject_delay.is_zero() {
                tokio::time::sleep(self.subject_delay).await;
            }

            let item = self.process(subject, &mut stats).await;
            items.push(item);

            on_progress(stats.processed(), total, stats.failed);
        }

        tracing::info!(
            "Batch complete: {} succeeded, {} failed",
            stats.successful,
            stats.failed
        );

        BatchResult { items, stats }
    }

    async fn process(&self, subject: &Subject, stats: &mut BatchStats) -> BatchItem {
        let company_page = subject.company_page_url();

        let (mut record, error) = match self
            .orchestrator
            .enrich(&subject.website_url, company_page, false)
            .await
        {
            Ok(record) => {
                stats.successful += 1;
                stats
                    .company_website
                    .record(!record.has_error(Source::CompanyWebsite));
                if company_page.is_some() {
                    stats
                        .linkedin_company
                        .record(!record.has_error(Source::LinkedInCompany));
                }
                (record, None)
            }
            Err(e) => {
                tracing::warn!("Enrichment of {} failed: {}", subject.name, e);
                stats.failed += 1;
                stats.company_website.record(false);
                (EnrichmentRecord::default(), Some(e.to_string()))
            }
        };

        if let Some(profile_url) = subject.profile_url() {
            match self
                .orchestrator
                .scrape_profile(profile_url, &subject.name)
                .await
            {
                Ok(profile) => {
                    stats.linkedin_profile.record(true);
                    record.lead_profile = Some(profile);
                    record.mark_scraped(Source::LinkedInProfile);
                }
                Err(e) => {
                    stats.linkedin_profile.record(false);
                    record.record_error(Source::LinkedInProfile, e.to_string());
                }
            }
        }

        BatchItem {
            subject: subject.clone(),
            record,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsConfig;
    use crate::enrichment::NewsClient;
    use crate::fetcher::{FetchedHtml, PageFetcher};
    use crate::state::SharedState;
    use crate::FetchError;
    use async_trait::async_trait;
    use url::Url;

    struct StaticFetcher;

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn get(&self, url: &Url, _timeout: Duration) -> Result<FetchedHtml, FetchError> {
            Ok(FetchedHtml {
                final_url: url.clone(),
                status: 200,
                html: "<html><head><title>Company</title></head><body></body></html>".to_string(),
                title: Some("Company".to_string()),
            })
        }
    }

    fn runner(subject_delay: Duration) -> BatchRunner {
        let news = NewsClient::from_config(&NewsConfig::default(), reqwest::Client::new());
        let orchestrator =
            EnrichmentOrchestrator::new(Arc::new(StaticFetcher), SharedState::new(Duration::ZERO), news);
        BatchRunner::new(Arc::new(orchestrator)).with_subject_delay(subject_delay)
    }

    fn subjects(count: usize) -> Vec<Subject> {
        (1..=count)
            .map(|i| Subject {
                name: format!("Person {}", i),
                website_url: format!("https://company{}.test", i),
                linkedin_url: None,
                company_linkedin_url: None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_subjects() {
        let start = tokio::time::Instant::now();
        let result = runner(Duration::from_secs(5)).run(&subjects(3), |_, _, _| {}).await;

        assert_eq!(result.stats.successful, 3);
        // Two gaps; none before the first subject
        assert!(start.elapsed() >= Duration::from_secs(10));
        assert!(start.elapsed() < Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_subject_is_not_delayed() {
        let start = tokio::time::Instant::now();
        runner(Duration::from_secs(5)).run(&subjects(1), |_, _, _| {}).await;
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
