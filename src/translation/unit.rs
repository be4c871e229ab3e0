/*!
 * The per-block translation record.
 */

use serde::{Deserialize, Serialize};

use crate::preservation::PreservationMap;

/// One text block moving through mask, translate and restore
///
/// `final_text` is only set after a successful restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Caller-supplied identifier used to re-associate concurrent results
    pub id: String,
    pub original_text: String,
    pub masked_text: String,
    pub translated_masked_text: Option<String>,
    pub final_text: Option<String>,
    pub preservation_map: PreservationMap,
}

impl TranslationUnit {
    /// A unit that has been masked but not yet translated
    pub fn masked(
        id: impl Into<String>,
        original_text: impl Into<String>,
        masked_text: String,
        preservation_map: PreservationMap,
    ) -> Self {
        Self {
            id: id.into(),
            original_text: original_text.into(),
            masked_text,
            translated_masked_text: None,
            final_text: None,
            preservation_map,
        }
    }

    /// Record the translator output and the restored text
    pub fn complete(&mut self, translated_masked_text: String, final_text: String) {
        self.translated_masked_text = Some(translated_masked_text);
        self.final_text = Some(final_text);
    }

    pub fn is_complete(&self) -> bool {
        self.final_text.is_some()
    }

    /// Number of protected terms in this unit
    pub fn protected_terms(&self) -> usize {
        self.preservation_map.len()
    }
}
