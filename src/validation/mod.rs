/*!
 * Semantic validation of translations.
 *
 * # Architecture
 *
 * - `similarity`: Cosine similarity of embeddings, normalized to [0, 1]
 * - `quality`: Quality tiers, confidence and suggestions
 * - `service`: The `SemanticValidator` combining both with term checks
 */

pub mod quality;
pub mod service;
pub mod similarity;

// Re-export main types
pub use quality::{QualityClassifier, QualityThresholds, TranslationQuality};
pub use service::{
    SemanticValidator, ValidationDetails, ValidationOutcome, ValidationResult, VALIDATION_METRICS,
};
pub use similarity::{cosine_similarity, normalized_similarity, SimilarityScorer};
