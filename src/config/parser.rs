use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable holding the completion service key
pub const COMPLETION_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the headline lookup key
pub const NEWS_KEY_ENV: &str = "NEWS_API_KEY";

/// Loads and parses a configuration file from the given path
///
/// Credentials from the environment override any key set in the file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_intel::config::load_config;
///
/// let config = load_config(Path::new("site-intel.toml")).unwrap();
/// println!("Max pages: {}", config.analysis.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parses and validates configuration from a TOML string
///
/// Environment overrides are not applied.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the default configuration with environment credentials applied
pub fn default_config() -> Config {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    config
}

/// Replaces configured credentials with non-empty environment values
pub fn apply_env_overrides(config: &mut Config) {
    if let Some(key) = env_value(COMPLETION_KEY_ENV) {
        config.completion.api_key = Some(key);
    }

    if let Some(key) = env_value(NEWS_KEY_ENV) {
        config.news.api_key = Some(key);
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Stored next to persisted results so records can be traced back to the
/// settings that produced them.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
