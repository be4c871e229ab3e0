/*!
 * Semantic validation of translations.
 *
 * Combines the similarity scorer, the quality classifier and a term
 * preservation check into a single result. The embedding provider is an
 * external dependency and may be unavailable; in that case validation
 * reports `Unavailable` instead of inventing a score.
 */

use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::ValidationConfig;
use crate::preservation::TermExtractor;
use crate::providers::EmbeddingProvider;

use super::quality::{QualityClassifier, QualityThresholds, TranslationQuality};
use super::similarity::SimilarityScorer;

/// Timing and length details of a validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetails {
    pub processing_time_ms: u64,
    /// Characters in the original
    pub original_length: usize,
    /// Characters in the translation
    pub translated_length: usize,
    pub length_ratio: f64,
}

/// Result of validating one translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Normalized similarity in [0, 1]
    pub similarity_score: f64,
    pub quality: TranslationQuality,
    /// Confidence in [0, 1]
    pub confidence_score: f64,
    pub technical_terms_preserved: bool,
    /// Similarity reached the validator's quality threshold
    #[serde(default)]
    pub meets_threshold: bool,
    pub suggestions: Vec<String>,
    pub details: ValidationDetails,
}

impl ValidationResult {
    /// Result for an empty original or translation
    fn empty_input(original: &str, translated: &str) -> Self {
        Self {
            similarity_score: 0.0,
            quality: TranslationQuality::Poor,
            confidence_score: 0.0,
            technical_terms_preserved: false,
            meets_threshold: false,
            suggestions: vec!["Empty text provided".to_string()],
            details: ValidationDetails {
                processing_time_ms: 0,
                original_length: original.chars().count(),
                translated_length: translated.chars().count(),
                length_ratio: QualityClassifier::length_ratio(original, translated),
            },
        }
    }
}

/// Outcome of a validation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Validated(ValidationResult),
    /// The embedding provider could not be reached
    Unavailable { reason: String },
}

impl ValidationOutcome {
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            Self::Validated(result) => Some(result),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn similarity_score(&self) -> Option<f64> {
        self.result().map(|r| r.similarity_score)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Validated(_))
    }

    /// Collapse into a result, using a low-confidence POOR default when unavailable
    pub fn into_result(self) -> ValidationResult {
        match self {
            Self::Validated(result) => result,
            Self::Unavailable { reason } => ValidationResult {
                similarity_score: 0.0,
                quality: TranslationQuality::Poor,
                confidence_score: 0.0,
                technical_terms_preserved: false,
                meets_threshold: false,
                suggestions: vec![format!("Validation unavailable: {}", reason)],
                details: ValidationDetails {
                    processing_time_ms: 0,
                    original_length: 0,
                    translated_length: 0,
                    length_ratio: 0.0,
                },
            },
        }
    }
}

/// Metric names reported by the validator
pub const VALIDATION_METRICS: [&str; 5] = [
    "similarity_score",
    "quality_level",
    "confidence_score",
    "processing_time",
    "length_ratio",
];

/// Validates translations by embedding similarity
#[derive(Debug, Clone)]
pub struct SemanticValidator {
    scorer: SimilarityScorer,
    classifier: QualityClassifier,
    extractor: TermExtractor,
    quality_threshold: f64,
}

impl SemanticValidator {
    /// Create a validator with default thresholds
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            scorer: SimilarityScorer::new(provider),
            classifier: QualityClassifier::default(),
            extractor: TermExtractor::new(),
            quality_threshold: 0.7,
        }
    }

    /// Create a validator from configuration
    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &ValidationConfig) -> Self {
        Self::new(provider)
            .with_thresholds(QualityThresholds::from(config))
            .with_quality_threshold(config.quality_threshold)
    }

    pub fn with_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.classifier = QualityClassifier::new(thresholds);
        self
    }

    pub fn with_quality_threshold(mut self, threshold: f64) -> Self {
        self.quality_threshold = threshold;
        self
    }

    pub fn quality_threshold(&self) -> f64 {
        self.quality_threshold
    }

    pub fn classifier(&self) -> &QualityClassifier {
        &self.classifier
    }

    /// Names of the metrics a validation reports
    pub fn metrics(&self) -> Vec<&'static str> {
        VALIDATION_METRICS.to_vec()
    }

    /// Validate one translation
    pub async fn validate(&self, original: &str, translated: &str) -> ValidationOutcome {
        if original.is_empty() || translated.is_empty() {
            return ValidationOutcome::Validated(ValidationResult::empty_input(original, translated));
        }

        let start = Instant::now();
        match self.scorer.score(original, translated).await {
            Ok(score) => {
                let result = self.build_result(score, original, translated, start);
                debug!(
                    "Validation: similarity {:.3}, quality {}, confidence {:.3}",
                    result.similarity_score, result.quality, result.confidence_score
                );
                ValidationOutcome::Validated(result)
            }
            Err(e) => {
                warn!("Semantic validation unavailable: {}", e);
                ValidationOutcome::Unavailable { reason: e.to_string() }
            }
        }
    }

    /// Validate several pairs; all become unavailable if the provider fails
    pub async fn validate_batch(&self, pairs: &[(String, String)]) -> Vec<ValidationOutcome> {
        let start = Instant::now();
        let scorable: Vec<(String, String)> = pairs
            .iter()
            .filter(|(a, b)| !a.is_empty() && !b.is_empty())
            .cloned()
            .collect();

        let scores = match self.scorer.score_pairs(&scorable).await {
            Ok(scores) => scores,
            Err(e) => {
                warn!("Batch validation unavailable: {}", e);
                return pairs
                    .iter()
                    .map(|_| ValidationOutcome::Unavailable { reason: e.to_string() })
                    .collect();
            }
        };

        let mut scores = scores.into_iter();
        pairs
            .iter()
            .map(|(original, translated)| {
                if original.is_empty() || translated.is_empty() {
                    return ValidationOutcome::Validated(ValidationResult::empty_input(
                        original, translated,
                    ));
                }
                match scores.next() {
                    Some(score) => {
                        ValidationOutcome::Validated(self.build_result(score, original, translated, start))
                    }
                    None => ValidationOutcome::Unavailable {
                        reason: "Missing similarity score".to_string(),
                    },
                }
            })
            .collect()
    }

    fn build_result(&self, score: f64, original: &str, translated: &str, start: Instant) -> ValidationResult {
        let quality = self.classifier.classify(score);
        let meets_threshold = score >= self.quality_threshold;
        let mut suggestions = self.classifier.suggestions(quality, score);
        if !meets_threshold {
            suggestions.push(format!(
                "Similarity {:.3} is below the acceptance threshold {:.2}",
                score, self.quality_threshold
            ));
        }
        ValidationResult {
            similarity_score: score,
            quality,
            confidence_score: self.classifier.confidence(score, original, translated),
            technical_terms_preserved: self.extractor.verify(original, translated),
            meets_threshold,
            suggestions,
            details: ValidationDetails {
                processing_time_ms: start.elapsed().as_millis() as u64,
                original_length: original.chars().count(),
                translated_length: translated.chars().count(),
                length_ratio: QualityClassifier::length_ratio(original, translated),
            },
        }
    }
}
