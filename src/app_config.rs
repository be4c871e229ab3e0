use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation service config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Embedding service config
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Semantic validation config
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Term preservation config
    #[serde(default)]
    pub preservation: PreservationConfig,

    /// Translation cache config
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Azure OpenAI
    Azure,
}

impl ProviderType {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Azure => "Azure OpenAI",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Azure => write!(f, "azure"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "azure" => Ok(Self::Azure),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: ProviderType,

    /// Model name (Azure: deployment name)
    #[serde(default = "default_model")]
    pub model: String,

    /// Service endpoint URL (empty: public OpenAI endpoint)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Azure API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Upper bound on the wait for a whole batch, in seconds
    #[serde(default)]
    pub batch_timeout_secs: Option<u64>,

    /// Custom system prompt template
    /// Placeholders: {source_language}, {target_language}, {token}
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Context passed to the translator with every request
    #[serde(default = "default_context")]
    pub context: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: default_model(),
            endpoint: String::new(),
            api_key: String::new(),
            api_version: default_api_version(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
            batch_timeout_secs: None,
            system_prompt: None,
            context: default_context(),
        }
    }
}

/// Embedding service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Embedding model (Azure: deployment name)
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Endpoint override (empty: same as translation)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// API key override (empty: same as translation)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Vector dimension
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            endpoint: String::new(),
            api_key: String::new(),
            dimension: default_embedding_dimension(),
        }
    }
}

/// Semantic validation configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Whether translations are scored against the original
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Lower bound of the EXCELLENT tier
    #[serde(default = "default_excellent_threshold")]
    pub excellent_threshold: f64,

    /// Lower bound of the GOOD tier
    #[serde(default = "default_good_threshold")]
    pub good_threshold: f64,

    /// Lower bound of the NEEDS_REVIEW tier
    #[serde(default = "default_needs_review_threshold")]
    pub needs_review_threshold: f64,

    /// Similarity below which a result is flagged in reports
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            excellent_threshold: default_excellent_threshold(),
            good_threshold: default_good_threshold(),
            needs_review_threshold: default_needs_review_threshold(),
            quality_threshold: default_quality_threshold(),
        }
    }
}

/// Term preservation configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PreservationConfig {
    /// Whether technical terms are masked before translation
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Texts shorter than this (characters) carry no terms
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,
}

impl Default for PreservationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_text_length: default_min_text_length(),
        }
    }
}

/// Translation cache configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Whether successful translations are cached
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached results
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_cache_capacity(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ja".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_version() -> String {
    "2024-02-15-preview".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_concurrent_requests() -> usize {
    3
}

fn default_context() -> Option<String> {
    Some("CVE security document translation".to_string())
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1536
}

fn default_excellent_threshold() -> f64 {
    0.9
}

fn default_good_threshold() -> f64 {
    0.7
}

fn default_needs_review_threshold() -> f64 {
    0.5
}

fn default_quality_threshold() -> f64 {
    0.7
}

fn default_min_text_length() -> usize {
    3
}

fn default_cache_capacity() -> usize {
    512
}

fn default_true() -> bool {
    true
}

/// Environment variables read by `apply_env_overrides`
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_AZURE_KEY: &str = "AZURE_OPENAI_KEY";
pub const ENV_AZURE_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_AZURE_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

impl Config {
    /// Load a configuration file (JSON)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Apply credentials from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply credentials from a variable lookup; empty values are ignored
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        match self.translation.provider {
            ProviderType::OpenAI => {
                if let Some(key) = get(ENV_OPENAI_API_KEY) {
                    self.translation.api_key = key;
                }
            }
            ProviderType::Azure => {
                if let Some(key) = get(ENV_AZURE_KEY) {
                    self.translation.api_key = key;
                }
                if let Some(endpoint) = get(ENV_AZURE_ENDPOINT) {
                    self.translation.endpoint = endpoint;
                }
                if let Some(version) = get(ENV_AZURE_API_VERSION) {
                    self.translation.api_version = version;
                }
            }
        }

        // Embeddings on Azure may still go through the public OpenAI API
        if self.embedding.api_key.is_empty() && self.translation.provider == ProviderType::Azure {
            if let Some(key) = get(ENV_OPENAI_API_KEY) {
                self.embedding.api_key = key;
                self.embedding.endpoint = crate::providers::openai::OPENAI_DEFAULT_ENDPOINT.to_string();
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        crate::language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        crate::language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        // Validate API key and endpoint per provider
        let translation = &self.translation;
        if translation.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                translation.provider.display_name()
            ));
        }
        match translation.provider {
            ProviderType::OpenAI => {
                if !translation.endpoint.is_empty() {
                    validate_endpoint(&translation.endpoint)?;
                }
            }
            ProviderType::Azure => {
                if translation.endpoint.trim().is_empty() {
                    return Err(anyhow!("Endpoint is required for Azure OpenAI provider"));
                }
                validate_endpoint(&translation.endpoint)?;
                if translation.api_version.trim().is_empty() {
                    return Err(anyhow!("API version is required for Azure OpenAI provider"));
                }
            }
        }
        if !self.embedding.endpoint.is_empty() {
            validate_endpoint(&self.embedding.endpoint)?;
        }

        if translation.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&translation.temperature) {
            return Err(anyhow!("temperature must be between 0.0 and 2.0"));
        }
        if self.embedding.dimension == 0 {
            return Err(anyhow!("Embedding dimension must be greater than 0"));
        }
        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(anyhow!("Cache capacity must be greater than 0 when caching is enabled"));
        }

        // Thresholds must be ordered within [0, 1]
        let v = &self.validation;
        for (name, value) in [
            ("excellent_threshold", v.excellent_threshold),
            ("good_threshold", v.good_threshold),
            ("needs_review_threshold", v.needs_review_threshold),
            ("quality_threshold", v.quality_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("{} must be between 0.0 and 1.0, got {}", name, value));
            }
        }
        if !(v.excellent_threshold >= v.good_threshold && v.good_threshold >= v.needs_review_threshold) {
            return Err(anyhow!(
                "Quality thresholds must be ordered: excellent >= good >= needs_review"
            ));
        }

        Ok(())
    }

    /// Printable configuration summary without secrets
    pub fn display_summary(&self) -> String {
        let endpoint = if self.translation.endpoint.is_empty() {
            crate::providers::openai::OPENAI_DEFAULT_ENDPOINT
        } else {
            self.translation.endpoint.as_str()
        };
        let key_state = if self.translation.api_key.is_empty() { "missing" } else { "set" };

        let mut lines = vec![
            format!(
                "Languages: {} -> {}",
                crate::language_utils::display_name(&self.source_language),
                crate::language_utils::display_name(&self.target_language)
            ),
            format!("Provider: {} ({})", self.translation.provider.display_name(), endpoint),
            format!("Model: {}", self.translation.model),
            format!("API key: {}", key_state),
            format!(
                "Temperature: {} / Max tokens: {} / Timeout: {}s",
                self.translation.temperature, self.translation.max_tokens, self.translation.timeout_secs
            ),
            format!("Concurrent requests: {}", self.translation.concurrent_requests),
            format!(
                "Embedding: {} ({} dimensions)",
                self.embedding.model, self.embedding.dimension
            ),
            format!(
                "Validation: {} (threshold {})",
                if self.validation.enabled { "enabled" } else { "disabled" },
                self.validation.quality_threshold
            ),
            format!(
                "Term preservation: {}",
                if self.preservation.enabled { "enabled" } else { "disabled" }
            ),
        ];
        if self.cache.enabled {
            lines.push(format!("Cache: enabled ({} entries)", self.cache.capacity));
        } else {
            lines.push("Cache: disabled".to_string());
        }
        lines.join("\n")
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = url::Url::parse(endpoint).with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(anyhow!("Unsupported endpoint scheme '{}' in {}", scheme, endpoint)),
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            embedding: EmbeddingConfig::default(),
            validation: ValidationConfig::default(),
            preservation: PreservationConfig::default(),
            cache: CacheConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.translation.api_key = "sk-test".to_string();
        config
    }

    #[test]
    fn test_default_shouldUseAdvisoryDefaults() {
        let config = Config::default();
        assert_eq!(config.source_language, "en");
        assert_eq!(config.target_language, "ja");
        assert_eq!(config.translation.temperature, 0.1);
        assert_eq!(config.translation.max_tokens, 2000);
        assert_eq!(config.translation.concurrent_requests, 3);
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.validation.excellent_threshold, 0.9);
        assert_eq!(config.preservation.min_text_length, 3);
    }

    #[test]
    fn test_deserialize_withPartialJson_shouldFillDefaults() {
        let config: Config =
            serde_json::from_str(r#"{"translation": {"provider": "azure", "model": "gpt-4o-ja"}}"#).unwrap();
        assert_eq!(config.translation.provider, ProviderType::Azure);
        assert_eq!(config.translation.model, "gpt-4o-ja");
        assert_eq!(config.translation.api_version, "2024-02-15-preview");
        assert_eq!(config.target_language, "ja");
        assert_eq!(config.cache.capacity, 512);
    }

    #[test]
    fn test_validate_withoutApiKey_shouldFail() {
        assert!(Config::default().validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_withAzureWithoutEndpoint_shouldFail() {
        let mut config = valid_config();
        config.translation.provider = ProviderType::Azure;
        assert!(config.validate().is_err());

        config.translation.endpoint = "https://example.openai.azure.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_withBadValues_shouldFail() {
        let mut config = valid_config();
        config.target_language = "klingon".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.validation.good_threshold = 0.95;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.translation.concurrent_requests = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.translation.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_applyEnvOverrides_withAzure_shouldSetCredentials() {
        let vars: HashMap<&str, &str> = [
            (ENV_AZURE_KEY, "azure-key"),
            (ENV_AZURE_ENDPOINT, "https://example.openai.azure.com"),
            (ENV_AZURE_API_VERSION, ""),
            (ENV_OPENAI_API_KEY, "sk-embed"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.translation.provider = ProviderType::Azure;
        config.apply_env_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.translation.api_key, "azure-key");
        assert_eq!(config.translation.endpoint, "https://example.openai.azure.com");
        assert_eq!(config.translation.api_version, "2024-02-15-preview");
        assert_eq!(config.embedding.api_key, "sk-embed");
    }

    #[test]
    fn test_displaySummary_shouldHideApiKey() {
        let summary = valid_config().display_summary();
        assert!(summary.contains("English -> Japanese"));
        assert!(summary.contains("API key: set"));
        assert!(!summary.contains("sk-test"));
    }
}
