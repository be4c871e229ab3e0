/*!
 * Integration tests for the orchestrator and batch translator
 */

use std::sync::Arc;

use cve_translator::errors::ErrorCategory;
use cve_translator::providers::mock::{MockEmbedder, MockTranslator};
use cve_translator::translation::{BatchItem, BatchTranslator, TranslationCache};
use cve_translator::validation::{SemanticValidator, TranslationQuality, ValidationOutcome};

use crate::common::{ADVISORY_SENTENCE, init_logger, mock_orchestrator, validating_orchestrator};

#[tokio::test]
async fn test_translateUnit_withIdentityTranslator_shouldRestoreEveryTerm() {
    init_logger();
    let mock = MockTranslator::identity();
    let orchestrator = validating_orchestrator(mock.clone());

    let result = orchestrator.translate_unit(ADVISORY_SENTENCE, true).await;

    assert!(result.success);
    assert_eq!(result.translated_text, ADVISORY_SENTENCE);
    assert!(result.terms_preserved);
    assert!(result.missing_terms.is_empty());

    // The translator only ever saw tokens in place of the terms
    let sent = mock.received_texts();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].contains("CVE-2025-41225"));
    assert!(!sent[0].contains("VMware"));
    assert!(sent[0].contains("[KEEP:"));
    assert_eq!(sent[0], result.unit.masked_text);

    let map = &result.unit.preservation_map;
    assert!(result.unit.protected_terms() >= 2);
    assert!(map.token_for("CVE-2025-41225").is_some());
    assert!(map.token_for("VMware").is_some());

    match result.validation {
        Some(ValidationOutcome::Validated(validation)) => {
            assert_eq!(validation.quality, TranslationQuality::Excellent);
            assert!(validation.technical_terms_preserved);
            assert!((validation.similarity_score - 1.0).abs() < 1e-6);
        }
        other => panic!("Expected a validated outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_translateUnit_withTermsJoinedToJapanese_shouldReportTermsPreserved() {
    let mock = MockTranslator::working().with_custom_response(|request| {
        request.text.replace(" affects ", "は").replace(" products.", "製品に影響します。")
    });
    let orchestrator = validating_orchestrator(mock);

    let result = orchestrator.translate_unit("CVE-2025-41225 affects VMware products.", true).await;

    assert!(result.success);
    assert_eq!(result.translated_text, "CVE-2025-41225はVMware製品に影響します。");
    assert!(result.terms_preserved);
    assert!(result.missing_terms.is_empty());
    match result.validation {
        Some(ValidationOutcome::Validated(validation)) => {
            assert!(validation.technical_terms_preserved);
        }
        other => panic!("Expected a validated outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_translateUnit_withLiteralTokenInSource_shouldKeepItVerbatim() {
    let mock = MockTranslator::identity();
    let orchestrator = mock_orchestrator(mock.clone());
    let text = "Placeholders such as [KEEP:0000] appear near CVE-2025-41225.";

    let result = orchestrator.translate_unit(text, true).await;

    assert!(result.success);
    assert_eq!(result.translated_text, text);
    assert!(result.terms_preserved);
    assert_eq!(result.unit.preservation_map.token_for("CVE-2025-41225"), Some("[KEEP1:0000]"));
    assert!(mock.received_texts()[0].contains("[KEEP:0000]"));
}

#[tokio::test]
async fn test_translateUnit_withContext_shouldForwardItToTranslator() {
    let mock = MockTranslator::working();
    let orchestrator = mock_orchestrator(mock.clone());

    let result = orchestrator.translate_unit(ADVISORY_SENTENCE, true).await;
    let request = mock.last_request().unwrap();

    assert!(result.translated_text.starts_with("[ja] CVE-2025-41225"));
    assert_eq!(request.source_language, "en");
    assert_eq!(request.target_language, "ja");
    assert_eq!(request.context.as_deref(), Some("CVE security document translation"));
}

#[tokio::test]
async fn test_translateUnit_withDroppedTokens_shouldReportMissingTerms() {
    let orchestrator = validating_orchestrator(MockTranslator::dropping_tokens());

    let result = orchestrator.translate_unit(ADVISORY_SENTENCE, true).await;

    assert!(result.success);
    assert!(!result.terms_preserved);
    assert!(result.missing_terms.contains(&"CVE-2025-41225".to_string()));
    let preservation = result.preservation.unwrap();
    assert!(preservation.preservation_rate < 1.0);
    assert!(preservation.missing_term_list.iter().any(|t| t.starts_with("CVE-")));
}

#[tokio::test]
async fn test_translateUnit_withFailedEmbedder_shouldStillSucceed() {
    let orchestrator = mock_orchestrator(MockTranslator::identity())
        .with_validator(SemanticValidator::new(Arc::new(MockEmbedder::failing())));

    let result = orchestrator.translate_unit(ADVISORY_SENTENCE, true).await;

    assert!(result.success);
    let validation = result.validation.unwrap();
    assert!(!validation.is_available());
    assert_eq!(validation.similarity_score(), None);
}

#[tokio::test]
async fn test_translateBatch_withRateLimitedUnit_shouldIsolateFailure() {
    init_logger();
    let mock = MockTranslator::fail_when_contains("bypass", ErrorCategory::RateLimit);
    let batch = BatchTranslator::new(validating_orchestrator(mock.clone()), 2);

    let items = vec![
        BatchItem::new("u1", ADVISORY_SENTENCE),
        BatchItem::new("u2", "CVE-2024-37085 in VMware ESXi 7.0.3 allows an authentication bypass."),
        BatchItem::new("u3", "Update VMware Workstation to 17.6.3 to fix CVE-2025-22224."),
    ];
    let outcome = batch.translate_batch(items, true).await;

    assert_eq!(outcome.results.len(), 3);
    assert!(outcome.abandoned.is_empty());
    assert_eq!(outcome.successful(), 2);
    assert_eq!(outcome.failed(), 1);

    let failed = outcome.result_for("u2").unwrap();
    assert!(!failed.success);
    assert_eq!(failed.error_type, Some(ErrorCategory::RateLimit));
    assert!(failed.error.is_some());
    assert_eq!(failed.translated_text, failed.original_text);

    for id in ["u1", "u3"] {
        let result = outcome.result_for(id).unwrap();
        assert!(result.success, "{} should succeed", id);
        assert!(result.terms_preserved);
    }
    assert_eq!(mock.request_count(), 3);

    let stats = batch.orchestrator().statistics();
    assert_eq!(stats.total_translations, 3);
    assert_eq!(stats.successful_translations, 2);
    assert_eq!(stats.failed_translations, 1);
}

#[tokio::test]
async fn test_translateUnit_withCache_shouldSkipSecondRequest() {
    let mock = MockTranslator::working();
    let orchestrator = mock_orchestrator(mock.clone()).with_cache(TranslationCache::new(8));

    let first = orchestrator.translate_unit(ADVISORY_SENTENCE, true).await;
    let second = orchestrator.translate_unit(ADVISORY_SENTENCE, true).await;

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.translated_text, second.translated_text);
    assert_ne!(first.id, second.id);
    assert_eq!(mock.request_count(), 1);
    assert_eq!(orchestrator.statistics().cache_hits, 1);
}
