use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::errors::TemplateError;
use crate::domain::models::{Config, TemplateSet};
use crate::infrastructure::logging::logger::parse_log_level;

/// Environment variable consulted when `provider.api_key` is not configured
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Project config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "projectgpt.yaml";

/// Prefix for environment overrides (`PROJECTGPT_PROVIDER__MODEL=...`)
pub const ENV_PREFIX: &str = "PROJECTGPT_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No API key configured. Set {API_KEY_ENV} or provider.api_key")]
    MissingApiKey,

    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Provider base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Provider model cannot be empty")]
    EmptyModel,

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid template override: {0}")]
    InvalidTemplate(#[from] TemplateError),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `projectgpt.yaml` in the working directory (optional)
    /// 3. Environment variables (`PROJECTGPT_*` prefix, `__` for nesting)
    ///
    /// The API key falls back to `OPENAI_API_KEY` when not set by any layer.
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_with(None)
    }

    /// Load configuration from a specific file, which must exist
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        Self::load_with(Some(path.as_ref()))
    }

    /// Load from `path` when given, otherwise from the default file
    pub fn load_with(path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
        }

        let mut config: Config = Self::figment(path).extract().map_err(Box::new)?;

        if config.provider.api_key.as_deref().is_none_or(str::is_empty) {
            config.provider.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(path: Option<&Path>) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE))))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// The configured API key, or `MissingApiKey`
    pub fn api_key(config: &Config) -> Result<&str, ConfigError> {
        config
            .provider
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::api_key(config)?;

        let provider = &config.provider;
        if provider.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if provider.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if provider.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(provider.max_tokens));
        }
        if provider.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout(0));
        }

        let temperature = config.pipeline.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }

        if parse_log_level(&config.logging.level).is_err() {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        TemplateSet::from_config(&config.templates)?;

        Ok(())
    }
}
