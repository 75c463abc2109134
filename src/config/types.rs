use serde::Deserialize;

/// Main configuration structure for the pipeline
///
/// Every section has defaults, so an empty TOML file is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub politeness: PolitenessConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub completion: CompletionConfig,
    pub news: NewsConfig,
    pub storage: StorageConfig,
}

/// Page discovery, fetch and extraction tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    /// Maximum candidate pages in comprehensive mode
    pub max_pages: usize,

    /// Per-page fetch timeout in comprehensive mode (milliseconds)
    pub fetch_timeout_ms: u64,

    /// Maximum candidate pages in fast mode
    pub fast_max_pages: usize,

    /// Per-page fetch timeout in fast mode (milliseconds)
    pub fast_fetch_timeout_ms: u64,

    /// Number of pages fetched simultaneously within a batch
    pub fetch_concurrency: usize,

    /// Pause between fetch batches (milliseconds)
    pub batch_pause_ms: u64,

    /// Pages whose normalized text is shorter than this are dropped
    pub min_page_chars: usize,

    /// Combined content shorter than this is not sent for extraction
    pub min_content_chars: usize,

    /// Wall-clock budget for each discovery step (milliseconds)
    pub discovery_budget_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_pages: 15,
            fetch_timeout_ms: 30_000,
            fast_max_pages: 6,
            fast_fetch_timeout_ms: 15_000,
            fetch_concurrency: 3,
            batch_pause_ms: 500,
            min_page_chars: 100,
            min_content_chars: 100,
            discovery_budget_ms: 5_000,
        }
    }
}

/// Request pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolitenessConfig {
    /// Minimum time between requests to the same host (milliseconds)
    pub rate_limit_interval_ms: u64,

    /// Pause between subjects in a batch run (milliseconds)
    pub subject_delay_ms: u64,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            rate_limit_interval_ms: 2_000,
            subject_delay_ms: 1_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the client
    pub name: String,

    /// Version of the client
    pub version: String,

    /// URL with information about the client
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "SiteIntel".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/site-intel/site-intel".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.name, self.version, self.contact_url
        )
    }
}

/// Language-model completion service
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,

    /// Model identifier
    pub model: String,

    pub temperature: f32,

    pub max_tokens: u32,

    /// Timeout for a single completion call (milliseconds)
    pub timeout_ms: u64,

    /// API key; the `OPENAI_API_KEY` environment variable takes precedence
    pub api_key: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            max_tokens: 4_000,
            timeout_ms: 120_000,
            api_key: None,
        }
    }
}

/// Headline lookup service
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NewsConfig {
    pub base_url: String,

    /// Number of headlines requested per lookup
    pub page_size: u32,

    /// API key; the `NEWS_API_KEY` environment variable takes precedence.
    /// Lookup is skipped when no key is configured.
    pub api_key: Option<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org".to_string(),
            page_size: 3,
            api_key: None,
        }
    }
}

/// Output persistence
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database; results are only printed when unset
    pub database_path: Option<String>,

    /// Load stored enrichment records into the cache at startup
    pub warm_cache: bool,
}
