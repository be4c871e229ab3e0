/*!
 * Translation orchestrator.
 *
 * Runs one text block through the linear unit pipeline:
 *
 * 1. extract terms and build the preservation map (when preserving)
 * 2. mask terms with `[KEEP:NNNN]` tokens
 * 3. translate the masked text
 * 4. restore tokens
 * 5. verify that every original term survived
 * 6. validate semantic quality (optional, never fatal)
 * 7. update the shared statistics
 *
 * A translator failure ends the unit with a failed result carrying the
 * original text and the error category. Nothing is retried here.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::errors::{ErrorCategory, ProviderError};
use crate::preservation::{PreservationCodec, PreservationMap, PreservationStatistics, TermExtractor};
use crate::providers::{TranslationRequest, Translator};
use crate::validation::{SemanticValidator, ValidationOutcome};

use super::cache::TranslationCache;
use super::stats::{ProcessingStatistics, StatisticsSnapshot};
use super::unit::TranslationUnit;

/// Result of translating one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub id: String,
    pub success: bool,
    pub original_text: String,
    /// Restored translation, or the original text when the unit failed
    pub translated_text: String,
    pub unit: TranslationUnit,
    pub terms_preserved: bool,
    pub missing_terms: Vec<String>,
    pub preservation: Option<PreservationStatistics>,
    pub validation: Option<ValidationOutcome>,
    pub processing_time_ms: u64,
    pub error: Option<String>,
    pub error_type: Option<ErrorCategory>,
    pub from_cache: bool,
}

impl TranslationResult {
    /// A not-yet-successful result for a masked unit
    pub fn pending(unit: TranslationUnit) -> Self {
        Self {
            id: unit.id.clone(),
            success: false,
            original_text: unit.original_text.clone(),
            translated_text: unit.original_text.clone(),
            unit,
            terms_preserved: false,
            missing_terms: Vec::new(),
            preservation: None,
            validation: None,
            processing_time_ms: 0,
            error: None,
            error_type: None,
            from_cache: false,
        }
    }

    fn failed(unit: TranslationUnit, error: &ProviderError, elapsed: Duration) -> Self {
        Self {
            processing_time_ms: elapsed.as_millis() as u64,
            error: Some(error.to_string()),
            error_type: Some(error.category()),
            ..Self::pending(unit)
        }
    }

    /// A failed result for a unit whose task ended without producing one
    pub(crate) fn interrupted(id: &str, text: &str, message: String) -> Self {
        let unit = TranslationUnit::masked(id, text, text.to_string(), PreservationMap::empty());
        Self {
            error: Some(message),
            error_type: Some(ErrorCategory::Service),
            ..Self::pending(unit)
        }
    }

    /// Similarity score when validation ran and was available
    pub fn similarity_score(&self) -> Option<f64> {
        self.validation.as_ref().and_then(|v| v.similarity_score())
    }
}

/// Per-orchestrator translation options
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorOptions {
    pub source_language: String,
    pub target_language: String,
    /// Free-form context passed to the translator
    pub context: Option<String>,
    /// Default for `translate_unit` callers that do not choose
    pub preserve_terms: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "ja".to_string(),
            context: None,
            preserve_terms: true,
        }
    }
}

impl OrchestratorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            context: config.translation.context.clone(),
            preserve_terms: config.preservation.enabled,
        }
    }
}

/// Status of one pipeline component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub healthy: bool,
    pub detail: String,
}

/// Health of every component the orchestrator depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub translator: ComponentHealth,
    /// `None` when no validator is configured
    pub validator: Option<ComponentHealth>,
    pub extractor: ComponentHealth,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.translator.healthy
            && self.extractor.healthy
            && self.validator.as_ref().is_none_or(|v| v.healthy)
    }
}

/// Sample used by the extractor health probe
const HEALTH_PROBE_TEXT: &str = "CVE-2025-41225 affects VMware ESXi 7.0.3 with a CVSSv3 score of 8.8.";

/// Sequences the unit pipeline; clones share statistics and cache
#[derive(Debug, Clone)]
pub struct TranslationOrchestrator {
    translator: Arc<dyn Translator>,
    validator: Option<Arc<SemanticValidator>>,
    extractor: TermExtractor,
    codec: PreservationCodec,
    cache: Option<TranslationCache>,
    stats: ProcessingStatistics,
    options: OrchestratorOptions,
}

impl TranslationOrchestrator {
    pub fn new(translator: Arc<dyn Translator>, options: OrchestratorOptions) -> Self {
        Self {
            translator,
            validator: None,
            extractor: TermExtractor::new(),
            codec: PreservationCodec::new(),
            cache: None,
            stats: ProcessingStatistics::new(),
            options,
        }
    }

    pub fn with_validator(mut self, validator: SemanticValidator) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_extractor(mut self, extractor: TermExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    pub fn extractor(&self) -> &TermExtractor {
        &self.extractor
    }

    pub fn cache(&self) -> Option<&TranslationCache> {
        self.cache.as_ref()
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_statistics(&self) {
        self.stats.reset();
    }

    /// Translate a text under a freshly generated id
    pub async fn translate_unit(&self, text: &str, preserve_terms: bool) -> TranslationResult {
        let id = uuid::Uuid::new_v4().to_string();
        self.translate_block(&id, text, preserve_terms).await
    }

    /// Translate a text block identified by `id`
    pub async fn translate_block(&self, id: &str, text: &str, preserve_terms: bool) -> TranslationResult {
        let start = Instant::now();
        let source = self.options.source_language.as_str();
        let target = self.options.target_language.as_str();

        // Cached entries always come from preserving runs
        if preserve_terms {
            if let Some(mut cached) = self.cache.as_ref().and_then(|c| c.get(text, source, target)) {
                cached.id = id.to_string();
                cached.unit.id = id.to_string();
                cached.from_cache = true;
                self.stats.record_cache_hit(start.elapsed());
                return cached;
            }
        }

        // Extract
        let map = if preserve_terms {
            let terms = self.extractor.extract(text);
            self.codec.build_map(text, &terms)
        } else {
            PreservationMap::empty()
        };

        // Mask
        let masked = self.codec.mask(text, &map);
        debug!("Unit {}: masked {} terms", id, map.len());
        let mut unit = TranslationUnit::masked(id, text, masked, map);

        // Translate
        let mut request = TranslationRequest::new(unit.masked_text.clone(), source, target);
        if let Some(context) = &self.options.context {
            request = request.with_context(context.clone());
        }

        let translated_masked = match self.translator.translate(&request).await {
            Ok(translated) => translated,
            Err(e) => {
                error!("Unit {} failed ({}): {}", id, e.category(), e);
                let elapsed = start.elapsed();
                self.stats.record_failure(elapsed);
                return TranslationResult::failed(unit, &e, elapsed);
            }
        };

        // Restore
        let lost_tokens = self.codec.missing_tokens(&translated_masked, &unit.preservation_map);
        if !lost_tokens.is_empty() {
            warn!("Unit {}: translator dropped {} protection tokens", id, lost_tokens.len());
        }
        let final_text = self.codec.restore(&translated_masked, &unit.preservation_map);
        unit.complete(translated_masked, final_text.clone());

        // Verify
        let preservation = self.extractor.preservation_statistics(text, &final_text);
        let terms_preserved = preservation.all_preserved();
        if !terms_preserved {
            warn!(
                "Unit {}: {} technical terms missing after translation: {:?}",
                id, preservation.missing_terms, preservation.missing_term_list
            );
        }

        // Validate
        let validation = match &self.validator {
            Some(validator) => Some(validator.validate(text, &final_text).await),
            None => None,
        };

        // Aggregate
        let elapsed = start.elapsed();
        self.stats.record_success(elapsed);

        let result = TranslationResult {
            id: id.to_string(),
            success: true,
            original_text: text.to_string(),
            translated_text: final_text,
            unit,
            terms_preserved,
            missing_terms: preservation.missing_term_list.clone(),
            preservation: Some(preservation),
            validation,
            processing_time_ms: elapsed.as_millis() as u64,
            error: None,
            error_type: None,
            from_cache: false,
        };

        if preserve_terms {
            if let Some(cache) = &self.cache {
                cache.store(source, target, &result);
            }
        }

        result
    }

    /// Probe every component; never fails
    pub async fn health_check(&self) -> HealthReport {
        let translator = match self.translator.test_connection().await {
            Ok(()) => ComponentHealth {
                healthy: true,
                detail: format!("{} reachable", self.translator.name()),
            },
            Err(e) => ComponentHealth {
                healthy: false,
                detail: e.to_string(),
            },
        };

        let validator = match &self.validator {
            Some(validator) => Some(match validator.validate("health check", "health check").await {
                ValidationOutcome::Validated(result) => ComponentHealth {
                    healthy: true,
                    detail: format!("similarity {:.3}", result.similarity_score),
                },
                ValidationOutcome::Unavailable { reason } => ComponentHealth {
                    healthy: false,
                    detail: reason,
                },
            }),
            None => None,
        };

        let terms = self.extractor.extract(HEALTH_PROBE_TEXT);
        let extractor = ComponentHealth {
            healthy: terms.contains("CVE-2025-41225"),
            detail: format!("{} terms in probe", terms.len()),
        };

        HealthReport {
            translator,
            validator,
            extractor,
        }
    }
}
