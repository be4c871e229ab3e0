/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockTranslator::working()` - Always succeeds, prefixing the target language
 * - `MockTranslator::failing(category)` - Always fails with an error of that category
 * - `MockTranslator::dropping_tokens()` - Loses every protection token
 * - `MockEmbedder::new()` - Deterministic bag-of-words embeddings
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ErrorCategory, ProviderError};
use crate::preservation::codec::TOKEN_REGEX;
use crate::providers::{EmbeddingProvider, TranslationRequest, Translator};

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[<target>] <text>`
    Working,
    /// Returns the text unchanged
    Identity,
    /// Succeeds but removes every protection token
    DropTokens,
    /// Succeeds but rewrites tokens with full-width punctuation
    MangleTokens,
    /// Always fails with an error of the given category
    Failing(ErrorCategory),
    /// Fails only for texts containing the needle
    FailWhenContains {
        needle: &'static str,
        category: ErrorCategory,
    },
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Returns an empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Build a provider error of the given category
pub fn simulated_error(category: ErrorCategory) -> ProviderError {
    match category {
        ErrorCategory::Authentication => {
            ProviderError::AuthenticationError("Simulated invalid API key".to_string())
        }
        ErrorCategory::RateLimit => {
            ProviderError::RateLimitExceeded("Simulated rate limit".to_string())
        }
        ErrorCategory::Service => ProviderError::ApiError {
            status_code: 500,
            message: "Simulated provider failure".to_string(),
        },
    }
}

/// Mock translator for testing orchestration behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    custom_response: Option<fn(&TranslationRequest) -> String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    pub fn failing(category: ErrorCategory) -> Self {
        Self::new(MockBehavior::Failing(category))
    }

    pub fn fail_when_contains(needle: &'static str, category: ErrorCategory) -> Self {
        Self::new(MockBehavior::FailWhenContains { needle, category })
    }

    pub fn dropping_tokens() -> Self {
        Self::new(MockBehavior::DropTokens)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator used by `Working`
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of translate calls so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn received_texts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.text.clone()).collect()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<TranslationRequest> {
        self.requests.lock().last().cloned()
    }

    fn working_response(&self, request: &TranslationRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[{}] {}", request.target_language, request.text),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Working => Ok(self.working_response(request)),

            MockBehavior::Identity => Ok(request.text.clone()),

            MockBehavior::DropTokens => {
                let stripped = TOKEN_REGEX.replace_all(&request.text, "");
                Ok(format!("[{}] {}", request.target_language, stripped))
            }

            MockBehavior::MangleTokens => {
                let mangled = TOKEN_REGEX.replace_all(&request.text, "［KEEP${generation}：${index}］");
                Ok(mangled.into_owned())
            }

            MockBehavior::Failing(category) => Err(simulated_error(category)),

            MockBehavior::FailWhenContains { needle, category } => {
                if request.text.contains(needle) {
                    Err(simulated_error(category))
                } else {
                    Ok(self.working_response(request))
                }
            }

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.working_response(request))
                }
            }

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.working_response(request))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing(category) => Err(simulated_error(category)),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Default dimension of mock embeddings
pub const MOCK_EMBEDDING_DIMENSION: usize = 64;

/// Deterministic embedder hashing words into buckets
///
/// Identical texts embed identically and texts sharing words are similar,
/// which is enough to exercise the validator without a network.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
    failing: bool,
    request_count: Arc<AtomicUsize>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::with_dimension(MOCK_EMBEDDING_DIMENSION)
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            failing: false,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// An embedder whose every call fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Number of embed calls so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn bag_of_words(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ProviderError::EmbeddingFailed(
                "Simulated embedding service outage".to_string(),
            ));
        }
        Ok(self.bag_of_words(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
