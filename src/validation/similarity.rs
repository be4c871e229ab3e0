/*!
 * Embedding-based semantic similarity.
 *
 * Raw cosine similarity lies in [-1, 1]; scores are rescaled to [0, 1] with
 * `(cos + 1) / 2`. Real translation pairs rarely produce negative cosines, so
 * most scores land in the upper half of the range and anything below ~0.5
 * should be read as degenerate. Zero vectors, mismatched dimensions and
 * non-finite values score exactly 0.0.
 */

use std::sync::Arc;

use log::debug;

use crate::errors::ProviderError;
use crate::providers::EmbeddingProvider;

/// Raw cosine similarity in [-1, 1], or `None` when undefined
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    cosine.is_finite().then(|| cosine.clamp(-1.0, 1.0))
}

/// Cosine similarity rescaled to [0, 1]; 0.0 when undefined
pub fn normalized_similarity(a: &[f32], b: &[f32]) -> f64 {
    match cosine_similarity(a, b) {
        Some(cosine) => ((cosine + 1.0) / 2.0).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Scores two texts through an embedding provider
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl SimilarityScorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Similarity of two texts in [0, 1]
    ///
    /// Only the embedding call can fail; the arithmetic never does.
    pub async fn score(&self, text_a: &str, text_b: &str) -> Result<f64, ProviderError> {
        let embeddings = self
            .provider
            .embed_batch(&[text_a.to_string(), text_b.to_string()])
            .await?;

        let score = match embeddings.as_slice() {
            [a, b] => normalized_similarity(a, b),
            _ => {
                return Err(ProviderError::EmbeddingFailed(format!(
                    "Expected 2 embeddings, received {}",
                    embeddings.len()
                )));
            }
        };

        debug!("Semantic similarity: {:.4}", score);
        Ok(score)
    }

    /// Similarity of several pairs, embedding all texts in one batch per side
    pub async fn score_pairs(&self, pairs: &[(String, String)]) -> Result<Vec<f64>, ProviderError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let originals: Vec<String> = pairs.iter().map(|(a, _)| a.clone()).collect();
        let translations: Vec<String> = pairs.iter().map(|(_, b)| b.clone()).collect();
        let original_embeddings = self.provider.embed_batch(&originals).await?;
        let translated_embeddings = self.provider.embed_batch(&translations).await?;

        if original_embeddings.len() != pairs.len() || translated_embeddings.len() != pairs.len() {
            return Err(ProviderError::EmbeddingFailed(
                "Embedding batch size does not match input".to_string(),
            ));
        }

        Ok(original_embeddings
            .iter()
            .zip(translated_embeddings.iter())
            .map(|(a, b)| normalized_similarity(a, b))
            .collect())
    }
}
