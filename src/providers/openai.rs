/*!
 * OpenAI and Azure OpenAI REST client.
 *
 * Chat completions are used for translation and `/embeddings` for similarity
 * vectors. The two services share payloads and differ only in URL layout and
 * authentication header.
 */

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app_config::{Config, ProviderType};
use crate::errors::ProviderError;
use crate::providers::{EmbeddingProvider, TranslationRequest, Translator};
use crate::translation::prompts::TranslationPrompt;

/// Default public OpenAI endpoint
pub const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Texts shorter than this are returned untranslated
const MIN_TRANSLATABLE_CHARS: usize = 3;

/// Which REST dialect to speak
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFlavor {
    /// api.openai.com style: bearer token, model in the body
    OpenAI,
    /// Azure OpenAI: `api-key` header, deployment in the path, `api-version` query
    Azure { api_version: String },
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Embedding request
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

/// Embedding response
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

/// Client for the OpenAI and Azure OpenAI APIs
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    flavor: ApiFlavor,
    endpoint: String,
    api_key: String,
    model: String,
    embedding_endpoint: String,
    embedding_api_key: String,
    embedding_model: String,
    dimension: usize,
    temperature: f32,
    max_tokens: u32,
    prompt: TranslationPrompt,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("flavor", &self.flavor)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    /// Create a client for one endpoint, model and key
    pub fn new(
        flavor: ApiFlavor,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            flavor,
            embedding_endpoint: endpoint.clone(),
            embedding_api_key: api_key.clone(),
            endpoint,
            api_key,
            model: model.into(),
            embedding_model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            temperature: 0.1,
            max_tokens: 2000,
            prompt: TranslationPrompt::default(),
        }
    }

    /// Build a client from the application configuration
    pub fn from_config(config: &Config) -> Self {
        let translation = &config.translation;
        let flavor = match translation.provider {
            ProviderType::OpenAI => ApiFlavor::OpenAI,
            ProviderType::Azure => ApiFlavor::Azure {
                api_version: translation.api_version.clone(),
            },
        };
        let endpoint = if translation.endpoint.trim().is_empty() {
            OPENAI_DEFAULT_ENDPOINT.to_string()
        } else {
            translation.endpoint.clone()
        };

        let mut client = Self::new(flavor, endpoint, translation.api_key.clone(), translation.model.clone())
            .with_timeout(Duration::from_secs(translation.timeout_secs))
            .with_generation(translation.temperature, translation.max_tokens)
            .with_prompt(TranslationPrompt::from_override(translation.system_prompt.as_deref()))
            .with_embedding_model(config.embedding.model.clone(), config.embedding.dimension);

        if !config.embedding.endpoint.trim().is_empty() {
            client.embedding_endpoint = config.embedding.endpoint.trim_end_matches('/').to_string();
        }
        if !config.embedding.api_key.trim().is_empty() {
            client.embedding_api_key = config.embedding.api_key.clone();
        }
        client
    }

    /// Set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder().timeout(timeout).build().unwrap_or_default();
        self
    }

    /// Set sampling temperature and completion budget
    pub fn with_generation(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Set the system prompt
    pub fn with_prompt(mut self, prompt: TranslationPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// Set the embedding model (Azure: deployment) and its dimension
    pub fn with_embedding_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.embedding_model = model.into();
        self.dimension = dimension;
        self
    }

    /// URL of an operation (`chat/completions` or `embeddings`)
    fn operation_url(&self, base: &str, deployment: &str, operation: &str) -> Result<Url, ProviderError> {
        let raw = match &self.flavor {
            ApiFlavor::OpenAI => format!("{}/{}", base, operation),
            ApiFlavor::Azure { .. } => format!("{}/openai/deployments/{}/{}", base, deployment, operation),
        };
        let mut url = Url::parse(&raw)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint URL '{}': {}", raw, e)))?;
        if let ApiFlavor::Azure { api_version } = &self.flavor {
            url.query_pairs_mut().append_pair("api-version", api_version);
        }
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        match self.flavor {
            ApiFlavor::OpenAI => builder.bearer_auth(api_key),
            ApiFlavor::Azure { .. } => builder.header("api-key", api_key),
        }
    }

    /// Send a JSON request and decode the JSON response
    async fn post_json<B, R>(&self, url: Url, api_key: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let builder = self.client.post(url).json(body);
        let response = self.authorize(builder, api_key).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::ConnectionError(format!("Request timed out: {}", e))
            } else {
                ProviderError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Run a chat completion and return the first choice's text
    pub async fn complete(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> Result<String, ProviderError> {
        let url = self.operation_url(&self.endpoint, &self.model, "chat/completions")?;
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens,
        };

        let response: ChatCompletionResponse = self.post_json(url, &self.api_key, &request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                "Chat completion used {} tokens ({} prompt, {} completion)",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("Response contained no choices".to_string()))?;
        if choice.finish_reason.as_deref() == Some("length") {
            debug!("Chat completion stopped at the token limit");
        }

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content.trim().to_string()),
            _ => Err(ProviderError::ParseError("Empty response from translation service".to_string())),
        }
    }

    async fn request_embeddings(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, ProviderError> {
        let expected = inputs.len();
        let url = self.operation_url(&self.embedding_endpoint, &self.embedding_model, "embeddings")?;
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: inputs,
        };

        let mut response: EmbeddingResponse = self
            .post_json(url, &self.embedding_api_key, &request)
            .await
            .map_err(|e| match e {
                ProviderError::ParseError(message) => ProviderError::EmbeddingFailed(message),
                other => other,
            })?;

        if response.data.len() != expected {
            return Err(ProviderError::EmbeddingFailed(format!(
                "Expected {} embeddings, received {}",
                expected,
                response.data.len()
            )));
        }
        response.data.sort_by_key(|item| item.index);
        Ok(response.data.into_iter().map(|item| item.embedding).collect())
    }
}

fn clean_for_embedding(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

#[async_trait]
impl Translator for OpenAIClient {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        if request.text.trim().chars().count() < MIN_TRANSLATABLE_CHARS {
            return Ok(request.text.clone());
        }

        let mut messages = vec![ChatMessage::new(
            "system",
            self.prompt
                .system_message(&request.source_language, &request.target_language),
        )];
        if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
            messages.push(ChatMessage::new("system", TranslationPrompt::context_message(context)));
        }
        messages.push(ChatMessage::new("user", request.text.clone()));

        self.complete(messages, self.max_tokens).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let messages = vec![ChatMessage::new("user", "Test connection")];
        self.complete(messages, 5).await.map(|_| ())
    }

    fn name(&self) -> &str {
        match self.flavor {
            ApiFlavor::OpenAI => "openai",
            ApiFlavor::Azure { .. } => "azure",
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let cleaned = clean_for_embedding(text);
        if cleaned.is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }

        self.request_embeddings(vec![cleaned])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmbeddingFailed("No embedding returned".to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let cleaned: Vec<String> = texts.iter().map(|t| clean_for_embedding(t)).collect();
        let non_empty: Vec<String> = cleaned.iter().filter(|t| !t.is_empty()).cloned().collect();

        let mut fetched = if non_empty.is_empty() {
            Vec::new().into_iter()
        } else {
            self.request_embeddings(non_empty).await?.into_iter()
        };

        // Blank inputs keep their position as zero vectors
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in &cleaned {
            if text.is_empty() {
                embeddings.push(vec![0.0; self.dimension]);
            } else {
                embeddings.push(fetched.next().ok_or_else(|| {
                    ProviderError::EmbeddingFailed("Embedding response too short".to_string())
                })?);
            }
        }
        Ok(embeddings)
    }
}
