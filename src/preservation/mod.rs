/*!
 * Protection of technical terms across translation.
 *
 * - `patterns`: the ordered recognizer rules and term categories
 * - `extractor`: term extraction, translatability checks
 * - `codec`: reversible `[KEEP:NNNN]` masking
 * - `verification`: term preservation statistics
 */

pub mod codec;
pub mod extractor;
pub mod patterns;
pub mod verification;

pub use self::codec::{PreservationCodec, PreservationEntry, PreservationMap, format_token};
pub use self::extractor::{IntegrityReport, TechnicalTerm, TermExtractor, TermSet};
pub use self::patterns::TermCategory;
pub use self::verification::PreservationStatistics;
