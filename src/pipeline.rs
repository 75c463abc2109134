//! Pipeline facade
//!
//! `Pipeline` wires the components together from a `Config` and exposes the
//! five entry points a job runner calls: page discovery, website analysis,
//! company enrichment, profile scraping and batch enrichment.

use crate::batch::{BatchResult, BatchRunner, Subject};
use crate::config::{Config, COMPLETION_KEY_ENV};
use crate::discovery::{CandidateUrl, Discoverer};
use crate::enrichment::{EnrichmentOrchestrator, EnrichmentRecord, NewsClient, ProfileData};
use crate::extraction::{AnalysisResult, CompletionService, ExtractionEngine, OpenAiClient};
use crate::fetcher::{build_http_client, ConcurrentFetcher, HttpFetcher, PageFetcher};
use crate::state::{SharedState, SubjectKey};
use crate::url::normalize_seed;
use crate::{ConfigError, PipelineError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Page budget preset of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Fast,
    Comprehensive,
}

impl AnalysisMode {
    pub fn from_fast(fast: bool) -> Self {
        if fast {
            Self::Fast
        } else {
            Self::Comprehensive
        }
    }

    pub fn is_fast(self) -> bool {
        self == Self::Fast
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The website intelligence pipeline
pub struct Pipeline {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    completion: Option<Arc<dyn CompletionService>>,
    state: SharedState,
    orchestrator: Arc<EnrichmentOrchestrator>,
}

impl Pipeline {
    /// Builds the pipeline with HTTP-backed components
    ///
    /// A missing completion key is not an error here; `analyze_website`
    /// reports it before doing any network work.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::with_client(client.clone()));

        let completion: Option<Arc<dyn CompletionService>> =
            match OpenAiClient::from_config(&config.completion) {
                Ok(client) => {
                    tracing::debug!("Completion service ready (model {})", client.model());
                    Some(Arc::new(client))
                }
                Err(ConfigError::MissingCredential(_)) => None,
                Err(e) => return Err(e.into()),
            };

        let news = NewsClient::from_config(&config.news, client);
        Ok(Self::with_components(config, fetcher, completion, news))
    }

    /// Builds the pipeline around caller-supplied collaborators
    pub fn with_components(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        completion: Option<Arc<dyn CompletionService>>,
        news: NewsClient,
    ) -> Self {
        let state = SharedState::new(config.rate_limit_interval());
        let orchestrator = Arc::new(
            EnrichmentOrchestrator::new(fetcher.clone(), state.clone(), news)
                .with_request_timeout(Duration::from_millis(config.analysis.fetch_timeout_ms)),
        );

        Self {
            config,
            fetcher,
            completion,
            state,
            orchestrator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Ranked candidate pages for a site
    pub async fn discover_candidates(
        &self,
        seed_url: &str,
        max_pages: usize,
    ) -> Result<Vec<CandidateUrl>> {
        let seed = normalize_seed(seed_url)?;
        Ok(self.discoverer().discover(&seed, max_pages).await)
    }

    /// Candidate page URLs for a site, highest priority first
    pub async fn discover_pages(&self, seed_url: &str, max_pages: usize) -> Result<Vec<String>> {
        let candidates = self.discover_candidates(seed_url, max_pages).await?;
        Ok(candidates.into_iter().map(|c| c.url).collect())
    }

    /// Discovers, fetches and analyzes a website
    ///
    /// # Errors
    ///
    /// * `PipelineError::Config` - No completion key; nothing was fetched
    /// * `PipelineError::Url` - Unusable seed URL
    /// * `PipelineError::NoContent` - No page survived fetching, or the
    ///   combined text is too short; the completion service was not called
    /// * `PipelineError::Completion` / `PipelineError::Extraction` - The
    ///   analysis call or its answer failed
    pub async fn analyze_website(&self, seed_url: &str, fast: bool) -> Result<AnalysisResult> {
        self.config.require_completion_key()?;
        let completion = self
            .completion
            .clone()
            .ok_or(ConfigError::MissingCredential(COMPLETION_KEY_ENV))?;

        let seed = normalize_seed(seed_url)?;
        let mode = AnalysisMode::from_fast(fast);
        let limits = self.config.mode_limits(fast);

        tracing::info!(
            "Analyzing {} ({} mode, up to {} pages)",
            seed,
            mode,
            limits.max_pages
        );

        let candidates = self.discoverer().discover(&seed, limits.max_pages).await;
        let urls: Vec<Url> = candidates
            .iter()
            .filter_map(|c| Url::parse(&c.url).ok())
            .collect();

        let pages = ConcurrentFetcher::new(self.fetcher.clone(), self.state.rate_limiter.clone())
            .with_concurrency(self.config.analysis.fetch_concurrency)
            .with_batch_pause(Duration::from_millis(self.config.analysis.batch_pause_ms))
            .with_page_timeout(limits.fetch_timeout)
            .with_min_page_chars(self.config.analysis.min_page_chars)
            .fetch_all(&urls)
            .await;

        tracing::info!(
            "Fetched {}/{} candidate pages of {}",
            pages.len(),
            urls.len(),
            seed
        );

        if pages.is_empty() {
            return Err(PipelineError::NoContent(format!(
                "none of {} candidate pages of {} could be fetched",
                urls.len(),
                seed
            )));
        }

        ExtractionEngine::new(completion)
            .with_min_content_chars(self.config.analysis.min_content_chars)
            .extract(&pages, seed.as_str())
            .await
    }

    pub async fn enrich_company(
        &self,
        website_url: &str,
        linkedin_url: Option<&str>,
        refresh: bool,
    ) -> Result<EnrichmentRecord> {
        self.orchestrator
            .enrich(website_url, linkedin_url, refresh)
            .await
    }

    /// Cache and storage key of an enrichment subject
    pub fn subject_key(&self, website_url: &str, linkedin_url: Option<&str>) -> Result<SubjectKey> {
        self.orchestrator.subject_key(website_url, linkedin_url)
    }

    pub async fn scrape_profile(&self, profile_url: &str, name: &str) -> Result<ProfileData> {
        self.orchestrator.scrape_profile(profile_url, name).await
    }

    /// Enriches every subject in order; see `BatchRunner::run`
    pub async fn run_batch<F>(&self, subjects: &[Subject], on_progress: F) -> Result<BatchResult>
    where
        F: FnMut(usize, usize, usize),
    {
        let runner = BatchRunner::new(self.orchestrator.clone()).with_subject_delay(
            Duration::from_millis(self.config.politeness.subject_delay_ms),
        );
        Ok(runner.run(subjects, on_progress).await)
    }

    fn discoverer(&self) -> Discoverer {
        Discoverer::new(self.fetcher.clone())
            .with_budget(self.config.discovery_budget())
            .with_robots_agent(self.config.user_agent.name.clone())
    }
}
