/*!
 * # cve-translator
 *
 * A Rust library for translating security advisories (CVE documents) while
 * keeping their technical identifiers intact.
 *
 * ## Features
 *
 * - Extract technical terms (CVE IDs, CVSS scores, versions, products, URLs, paths, ...)
 * - Mask terms with reversible `[KEEP:NNNN]` tokens before translation
 * - Restore and verify terms after translation
 * - Score translations by embedding similarity and classify their quality
 * - Translate documents block by block with bounded concurrency
 * - OpenAI and Azure OpenAI providers
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `preservation`: Term extraction, masking and verification
 * - `translation`: Orchestrator, batching, caching and document fan-out
 * - `validation`: Semantic similarity and quality classification
 * - `providers`: Translator and embedding clients
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod preservation;
pub mod providers;
pub mod translation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, DocumentError, ErrorCategory, ProviderError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use preservation::{PreservationCodec, PreservationMap, PreservationStatistics, TechnicalTerm, TermCategory, TermExtractor};
pub use providers::{EmbeddingProvider, TranslationRequest, Translator};
pub use translation::{BatchTranslator, DocumentTranslator, TranslationOrchestrator, TranslationResult};
pub use validation::{SemanticValidator, TranslationQuality, ValidationOutcome, ValidationResult};
