/*!
 * Quality tiers, confidence and suggestions for a similarity score.
 */

use serde::{Deserialize, Serialize};

/// Discrete translation quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranslationQuality {
    Excellent,
    Good,
    NeedsReview,
    Poor,
}

impl TranslationQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::NeedsReview => "NEEDS_REVIEW",
            Self::Poor => "POOR",
        }
    }
}

impl std::fmt::Display for TranslationQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive lower bounds of each tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub excellent: f64,
    pub good: f64,
    pub needs_review: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.9,
            good: 0.7,
            needs_review: 0.5,
        }
    }
}

impl From<&crate::app_config::ValidationConfig> for QualityThresholds {
    fn from(config: &crate::app_config::ValidationConfig) -> Self {
        Self {
            excellent: config.excellent_threshold,
            good: config.good_threshold,
            needs_review: config.needs_review_threshold,
        }
    }
}

/// Similarity below which a meaning warning is added even at an acceptable tier
const LOW_SIMILARITY_WARNING: f64 = 0.6;

/// Originals of this many characters get full length reliability
const RELIABLE_TEXT_LENGTH: f64 = 1000.0;

/// Floor of the length reliability factor
const MIN_LENGTH_RELIABILITY: f64 = 0.3;

/// Maps similarity scores to tiers
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityClassifier {
    thresholds: QualityThresholds,
}

impl QualityClassifier {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> QualityThresholds {
        self.thresholds
    }

    /// Tier of a score; ties go to the better tier
    pub fn classify(&self, score: f64) -> TranslationQuality {
        if score >= self.thresholds.excellent {
            TranslationQuality::Excellent
        } else if score >= self.thresholds.good {
            TranslationQuality::Good
        } else if score >= self.thresholds.needs_review {
            TranslationQuality::NeedsReview
        } else {
            TranslationQuality::Poor
        }
    }

    /// Length ratio (translated / original) in characters
    pub fn length_ratio(original: &str, translated: &str) -> f64 {
        let original_len = original.chars().count();
        if original_len == 0 {
            return 0.0;
        }
        translated.chars().count() as f64 / original_len as f64
    }

    /// Confidence in a validation, independent from its tier.
    ///
    /// Mean of the similarity, a length-ratio plausibility factor and a
    /// reliability factor that grows with the original's length.
    pub fn confidence(&self, similarity: f64, original: &str, translated: &str) -> f64 {
        let ratio = Self::length_ratio(original, translated);
        let length_plausibility = if (0.5..=2.0).contains(&ratio) {
            1.0
        } else if (0.3..=3.0).contains(&ratio) {
            0.8
        } else {
            0.5
        };

        let reliability = (original.chars().count() as f64 / RELIABLE_TEXT_LENGTH)
            .clamp(MIN_LENGTH_RELIABILITY, 1.0);

        ((similarity.clamp(0.0, 1.0) + length_plausibility + reliability) / 3.0).clamp(0.0, 1.0)
    }

    /// Improvement suggestions for a tier
    pub fn suggestions(&self, quality: TranslationQuality, similarity: f64) -> Vec<String> {
        match quality {
            TranslationQuality::Poor => vec![
                "Consider retranslating this text".to_string(),
                "Check for missing or incorrect translations".to_string(),
                "Verify that technical terms are properly preserved".to_string(),
            ],
            TranslationQuality::NeedsReview => vec![
                "Review translation for accuracy".to_string(),
                "Consider alternative phrasing for better flow".to_string(),
            ],
            _ if similarity < LOW_SIMILARITY_WARNING => {
                vec!["Low semantic similarity - verify meaning preservation".to_string()]
            }
            _ => Vec::new(),
        }
    }
}
