/*!
 * Tests for similarity scoring and quality classification
 */

use std::sync::Arc;

use cve_translator::providers::mock::MockEmbedder;
use cve_translator::validation::{
    normalized_similarity, QualityClassifier, SemanticValidator, SimilarityScorer, TranslationQuality,
};

#[test]
fn test_classify_atThresholdBoundaries_shouldMatchTable() {
    let classifier = QualityClassifier::default();
    let cases = [
        (0.9, TranslationQuality::Excellent),
        (0.89999, TranslationQuality::Good),
        (0.7, TranslationQuality::Good),
        (0.69999, TranslationQuality::NeedsReview),
        (0.5, TranslationQuality::NeedsReview),
        (0.49999, TranslationQuality::Poor),
    ];
    for (score, expected) in cases {
        assert_eq!(classifier.classify(score), expected, "score {score}");
    }
}

#[test]
fn test_normalizedSimilarity_withZeroVector_shouldReturnExactlyZero() {
    assert_eq!(normalized_similarity(&[0.0; 8], &[1.0; 8]), 0.0);
}

#[tokio::test]
async fn test_score_withArbitraryInputs_shouldStayInUnitInterval() {
    let scorer = SimilarityScorer::new(Arc::new(MockEmbedder::new()));
    let texts = ["", " ", "CVE-2025-41225", "脆弱性", "Patch VMware ESXi now.", "[KEEP:0001]"];

    for a in texts {
        for b in texts {
            let score = scorer.score(a, b).await.unwrap();
            assert!((0.0..=1.0).contains(&score), "{a:?} vs {b:?} -> {score}");
        }
    }
}

#[tokio::test]
async fn test_validate_withUnavailableEmbeddings_shouldDegradeToDefault() {
    let validator = SemanticValidator::new(Arc::new(MockEmbedder::failing()));
    let outcome = validator.validate("Patch the host.", "ホストにパッチを適用してください。").await;

    assert!(!outcome.is_available());
    let fallback = outcome.into_result();
    assert_eq!(fallback.quality, TranslationQuality::Poor);
    assert_eq!(fallback.similarity_score, 0.0);
}

#[tokio::test]
async fn test_validate_withParaphrase_shouldProduceConfidenceAndDetails() {
    let validator = SemanticValidator::new(Arc::new(MockEmbedder::new()));
    let result = validator
        .validate("Apply the patch to every ESXi host.", "Apply the patch to each ESXi host.")
        .await
        .into_result();

    assert!(result.similarity_score > 0.5);
    assert!((0.0..=1.0).contains(&result.confidence_score));
    assert_eq!(result.details.original_length, 35);
    assert!(result.technical_terms_preserved);
}
