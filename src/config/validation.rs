use crate::config::types::{
    AnalysisConfig, CompletionConfig, Config, NewsConfig, PolitenessConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_analysis_config(&config.analysis)?;
    validate_politeness_config(&config.politeness)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_completion_config(&config.completion)?;
    validate_news_config(&config.news)?;
    Ok(())
}

/// Validates discovery and fetch tuning
fn validate_analysis_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    if config.fetch_concurrency < 1 || config.fetch_concurrency > 16 {
        return Err(ConfigError::Validation(format!(
            "fetch_concurrency must be between 1 and 16, got {}",
            config.fetch_concurrency
        )));
    }

    for (name, value) in [
        ("max_pages", config.max_pages),
        ("fast_max_pages", config.fast_max_pages),
    ] {
        if !(1..=100).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and 100, got {}",
                name, value
            )));
        }
    }

    for (name, value) in [
        ("fetch_timeout_ms", config.fetch_timeout_ms),
        ("fast_fetch_timeout_ms", config.fast_fetch_timeout_ms),
        ("discovery_budget_ms", config.discovery_budget_ms),
    ] {
        if value < 1_000 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1000ms, got {}ms",
                name, value
            )));
        }
    }

    Ok(())
}

fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    if config.rate_limit_interval_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_interval_ms must be <= 60000ms, got {}ms",
            config.rate_limit_interval_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

fn validate_completion_config(config: &CompletionConfig) -> Result<(), ConfigError> {
    validate_base_url("completion.base_url", &config.base_url)?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "completion model cannot be empty".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            config.temperature
        )));
    }

    if config.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "max_tokens must be >= 1".to_string(),
        ));
    }

    if config.timeout_ms < 1_000 {
        return Err(ConfigError::Validation(format!(
            "completion timeout_ms must be >= 1000ms, got {}ms",
            config.timeout_ms
        )));
    }

    Ok(())
}

fn validate_news_config(config: &NewsConfig) -> Result<(), ConfigError> {
    validate_base_url("news.base_url", &config.base_url)?;

    if config.page_size == 0 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "news page_size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    Ok(())
}

/// Base URLs of outbound services must be absolute HTTP(S) URLs
fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_concurrency() {
        let mut config = Config::default();
        config.analysis.fetch_concurrency = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.analysis.fetch_concurrency = 17;
        assert!(validate(&config).is_err());

        config.analysis.fetch_concurrency = 16;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_max_pages() {
        let mut config = Config::default();
        config.analysis.max_pages = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.analysis.fast_max_pages = 101;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_timeouts() {
        let mut config = Config::default();
        config.analysis.fetch_timeout_ms = 500;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.completion.timeout_ms = 10;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_temperature() {
        let mut config = Config::default();
        config.completion.temperature = 2.5;
        assert!(validate(&config).is_err());

        config.completion.temperature = 0.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_user_agent_name() {
        let mut config = Config::default();
        config.user_agent.name = "Site Intel".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_base_urls() {
        let mut config = Config::default();
        config.completion.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        let mut config = Config::default();
        config.news.base_url = "ftp://news.test".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        let mut config = Config::default();
        config.completion.base_url = "http://127.0.0.1:9000/v1".to_string();
        assert!(validate(&config).is_ok());
    }
}
