/*!
 * External collaborators of the translation pipeline.
 *
 * The pipeline only talks to two capabilities:
 * - `Translator`: text-to-text translation of masked text
 * - `EmbeddingProvider`: fixed-dimension embedding vectors
 *
 * Implementations:
 * - `openai`: OpenAI and Azure OpenAI REST clients
 * - `mock`: deterministic providers for tests and offline runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A request to translate one piece of (already masked) text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Optional free-form context for the translator
    pub context: Option<String>,
}

impl TranslationRequest {
    /// Create a new request without context
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            context: None,
        }
    }

    /// Attach translator context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Text translation capability
///
/// Implementations may fail with authentication, rate-limit or service
/// errors; callers only distinguish them through `ProviderError::category`.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate the request's text
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Test the connection to the translation service
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider name for logs and reports
    fn name(&self) -> &str;
}

/// Embedding capability
///
/// `embed("")` must return a zero vector of `dimension()` entries rather
/// than an error.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Dimension of the vectors returned by `embed`
    fn dimension(&self) -> usize;

    /// Embed several texts, preserving order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

pub mod mock;
pub mod openai;
