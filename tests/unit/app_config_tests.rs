/*!
 * Tests for application configuration functionality
 */

use std::collections::HashMap;

use cve_translator::app_config::{Config, LogLevel, ProviderType};
use tokio_test::{assert_err, assert_ok};

use crate::common::create_temp_dir;

fn configured() -> Config {
    let mut config = Config::default();
    config.translation.api_key = "sk-test".to_string();
    config
}

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "ja");
    assert_eq!(config.translation.provider, ProviderType::OpenAI);
    assert_eq!(config.translation.model, "gpt-4o");
    assert_eq!(config.translation.max_tokens, 2000);
    assert_eq!(config.translation.concurrent_requests, 3);
    assert_eq!(config.embedding.model, "text-embedding-3-small");
    assert_eq!(config.embedding.dimension, 1536);
    assert_eq!(config.validation.excellent_threshold, 0.9);
    assert_eq!(config.validation.good_threshold, 0.7);
    assert_eq!(config.validation.needs_review_threshold, 0.5);
    assert_eq!(config.preservation.min_text_length, 3);
    assert!(config.cache.enabled);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_saveAndLoad_withTempFile_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = configured();
    config.target_language = "fr".to_string();
    config.translation.batch_timeout_secs = Some(120);
    assert_ok!(config.save(&path));

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_withPartialJson_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{"target_language": "de", "translation": {"api_key": "k"}}"#).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.source_language, "en");
    assert_eq!(loaded.translation.temperature, 0.1);
    assert_ok!(loaded.validate());
}

#[test]
fn test_load_withMalformedJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_err!(Config::load(&path));
}

#[test]
fn test_validate_withVariousConfigs_shouldValidateCorrectly() {
    assert_err!(Config::default().validate());
    assert_ok!(configured().validate());

    let mut config = configured();
    config.source_language = "english".to_string();
    assert_err!(config.validate());

    let mut config = configured();
    config.translation.concurrent_requests = 0;
    assert_err!(config.validate());

    let mut config = configured();
    config.validation.good_threshold = 0.95;
    assert_err!(config.validate());

    let mut config = configured();
    config.embedding.endpoint = "not a url".to_string();
    assert_err!(config.validate());

    let mut config = configured();
    config.translation.provider = ProviderType::Azure;
    assert_err!(config.validate());
    config.translation.endpoint = "https://example.openai.azure.com".to_string();
    assert_ok!(config.validate());
}

#[test]
fn test_applyEnvOverrides_withAzureVariables_shouldFillCredentials() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("AZURE_OPENAI_KEY", "azure-key"),
        ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
        ("AZURE_OPENAI_API_VERSION", "2024-06-01"),
        ("OPENAI_API_KEY", "openai-key"),
    ]);
    let mut config = Config::default();
    config.translation.provider = ProviderType::Azure;

    config.apply_env_overrides_from(|name| env.get(name).map(|v| v.to_string()));

    assert_eq!(config.translation.api_key, "azure-key");
    assert_eq!(config.translation.endpoint, "https://example.openai.azure.com");
    assert_eq!(config.translation.api_version, "2024-06-01");
    assert_eq!(config.embedding.api_key, "openai-key");
    assert_ok!(config.validate());
}

#[test]
fn test_displaySummary_shouldNotLeakApiKey() {
    let summary = configured().display_summary();

    assert!(summary.contains("English"));
    assert!(summary.contains("Japanese"));
    assert!(!summary.contains("sk-test"));
}
