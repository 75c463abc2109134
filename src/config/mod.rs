//! Configuration module for Site-Intel
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a default, so the pipeline runs without a file; the
//! only hard requirement is a completion key for website analysis.
//!
//! # Example
//!
//! ```no_run
//! use site_intel::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-intel.toml")).unwrap();
//! println!("Fetching {} pages at a time", config.analysis.fetch_concurrency);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    AnalysisConfig, CompletionConfig, Config, NewsConfig, PolitenessConfig, StorageConfig,
    UserAgentConfig,
};

pub use parser::{
    apply_env_overrides, compute_config_hash, default_config, load_config, load_config_with_hash,
    parse_config, COMPLETION_KEY_ENV, NEWS_KEY_ENV,
};

use crate::ConfigError;
use std::time::Duration;

/// Page budget and timeout for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeLimits {
    pub max_pages: usize,
    pub fetch_timeout: Duration,
}

impl Config {
    /// Returns the completion key, failing before any network activity
    /// when none is configured
    pub fn require_completion_key(&self) -> Result<&str, ConfigError> {
        self.completion
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential(COMPLETION_KEY_ENV))
    }

    /// Limits for the fast (`true`) or comprehensive (`false`) preset
    pub fn mode_limits(&self, fast: bool) -> ModeLimits {
        if fast {
            ModeLimits {
                max_pages: self.analysis.fast_max_pages,
                fetch_timeout: Duration::from_millis(self.analysis.fast_fetch_timeout_ms),
            }
        } else {
            ModeLimits {
                max_pages: self.analysis.max_pages,
                fetch_timeout: Duration::from_millis(self.analysis.fetch_timeout_ms),
            }
        }
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.politeness.rate_limit_interval_ms)
    }

    pub fn discovery_budget(&self) -> Duration {
        Duration::from_millis(self.analysis.discovery_budget_ms)
    }
}
