//! Site-Intel: a website intelligence pipeline
//!
//! Given a seed URL this crate discovers the most relevant pages of a site,
//! fetches and normalizes them politely, and hands the aggregated text to a
//! structured-extraction service whose answer is validated against a fixed
//! schema. Independently it enriches company/person records from auxiliary
//! sources with per-host rate limiting and caching.

pub mod batch;
pub mod config;
pub mod discovery;
pub mod enrichment;
pub mod extraction;
pub mod fetcher;
pub mod pipeline;
pub mod robots;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No usable content: {0}")]
    NoContent(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Completion service error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Failures of a single outbound page request.
///
/// `AntiBot` and `NotFound` are classified from the served page body rather
/// than from the status code.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("anti-bot challenge detected at {url}")]
    AntiBot { url: String },

    #[error("not found or private: {url}")]
    NotFound { url: String },
}

impl FetchError {
    /// Short label for the failure class, used in logs and stats
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "http",
            Self::AntiBot { .. } => "anti-bot",
            Self::NotFound { .. } => "not-found",
        }
    }
}

/// Malformed or schema-invalid model output
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion service returned an empty response")]
    EmptyResponse,

    #[error("response is not valid JSON for the analysis schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response violates the analysis schema: {0}")]
    Schema(#[from] validator::ValidationErrors),
}

/// Transport-level failures talking to the completion service
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response had no choices")]
    NoChoices,
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use batch::{BatchResult, BatchRunner, BatchStats, Subject};
pub use config::Config;
pub use discovery::{CandidateUrl, DiscoveredVia, Discoverer};
pub use enrichment::{EnrichmentOrchestrator, EnrichmentRecord, ProfileData, Source};
pub use extraction::{AnalysisResult, CompletionService, ExtractionEngine};
pub use fetcher::{ConcurrentFetcher, FetchedPage, PageFetcher};
pub use pipeline::{AnalysisMode, Pipeline};
pub use state::{EnrichmentCache, RateLimiter, SubjectKey};
