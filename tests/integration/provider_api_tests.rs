/*!
 * Tests for the OpenAI client without a live service
 */

use cve_translator::errors::{ErrorCategory, ProviderError};
use cve_translator::providers::openai::{ApiFlavor, OpenAIClient};
use cve_translator::providers::{EmbeddingProvider, TranslationRequest, Translator};
use std::time::Duration;

/// Nothing listens on the discard port locally
const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:9/v1";

fn unreachable_client() -> OpenAIClient {
    OpenAIClient::new(ApiFlavor::OpenAI, UNREACHABLE_ENDPOINT, "sk-test", "gpt-4o")
        .with_timeout(Duration::from_secs(2))
        .with_embedding_model("text-embedding-3-small", 8)
}

#[tokio::test]
async fn test_translate_withUnreachableEndpoint_shouldReturnServiceError() {
    let client = unreachable_client();
    let request = TranslationRequest::new("CVE-2025-41225 affects VMware ESXi.", "en", "ja");

    let error = client.translate(&request).await.unwrap_err();

    assert!(matches!(error, ProviderError::ConnectionError(_)));
    assert_eq!(error.category(), ErrorCategory::Service);
}

#[tokio::test]
async fn test_testConnection_withUnreachableEndpoint_shouldFail() {
    assert!(unreachable_client().test_connection().await.is_err());
}

#[tokio::test]
async fn test_embed_withBlankText_shouldReturnZeroVector() {
    let client = unreachable_client();

    let embedding = client.embed("  \n ").await.unwrap();
    assert_eq!(embedding, vec![0.0; 8]);

    let batch = client.embed_batch(&[String::new(), "\n".to_string()]).await.unwrap();
    assert_eq!(batch.len(), 2);
    assert!(batch.iter().all(|v| v.len() == client.dimension() && v.iter().all(|x| *x == 0.0)));
}

#[tokio::test]
async fn test_embedBatch_withUnreachableEndpoint_shouldFail() {
    let texts = vec!["VMware ESXi".to_string(), String::new()];
    assert!(unreachable_client().embed_batch(&texts).await.is_err());
}

#[test]
fn test_name_shouldReflectFlavor() {
    let azure = OpenAIClient::new(
        ApiFlavor::Azure {
            api_version: "2024-02-15-preview".to_string(),
        },
        "https://example.openai.azure.com",
        "key",
        "gpt-4o",
    );
    assert_eq!(azure.name(), "azure");
    assert_eq!(unreachable_client().name(), "openai");
}
