/*!
 * Translation pipeline for security advisories.
 *
 * - `orchestrator`: The per-unit mask, translate, restore, verify, validate pipeline
 * - `batch`: Bounded concurrent fan-out of independent units
 * - `document`: Document processors and whole-document translation
 * - `cache`: Content-addressed LRU cache of unit results
 * - `stats`: Running statistics shared by an orchestrator's units
 * - `unit`: The per-block translation record
 * - `prompts`: System prompt templates
 */

// Re-export main types for easier usage
pub use self::batch::{BatchItem, BatchOutcome, BatchTranslator, ProgressCallback};
pub use self::cache::{CacheStats, TranslationCache};
pub use self::document::{
    DocumentProcessor, DocumentStats, DocumentTranslation, DocumentTranslator, PlainTextProcessor, TextBlock,
};
pub use self::orchestrator::{
    ComponentHealth, HealthReport, OrchestratorOptions, TranslationOrchestrator, TranslationResult,
};
pub use self::prompts::TranslationPrompt;
pub use self::stats::{ProcessingStatistics, StatisticsSnapshot};
pub use self::unit::TranslationUnit;

// Submodules
pub mod batch;
pub mod cache;
pub mod document;
pub mod orchestrator;
pub mod prompts;
pub mod stats;
pub mod unit;
