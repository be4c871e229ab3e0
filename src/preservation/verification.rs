/*!
 * Term preservation checks between an original text and its translation.
 */

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::extractor::TermExtractor;

/// Snapshot comparison of the terms of two texts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreservationStatistics {
    /// Raw term matches in the original, duplicates included
    pub total_original_terms: usize,
    /// Distinct term strings in the original
    pub unique_original_terms: usize,
    /// Distinct original terms also found in the translation
    pub preserved_terms: usize,
    /// Distinct original terms absent from the translation
    pub missing_terms: usize,
    /// Distinct terms of the translation absent from the original
    pub added_terms: usize,
    /// preserved / unique, 1.0 when the original has no terms
    pub preservation_rate: f64,
    pub missing_term_list: Vec<String>,
    pub added_term_list: Vec<String>,
    pub preserved_term_list: Vec<String>,
}

impl PreservationStatistics {
    pub fn all_preserved(&self) -> bool {
        self.missing_terms == 0
    }
}

impl TermExtractor {
    /// True iff every term of `original` is also a term of `translated`
    pub fn verify(&self, original: &str, translated: &str) -> bool {
        let translated_terms = self.extract(translated);
        let translated_set = translated_terms.text_set();
        self.extract(original)
            .iter()
            .all(|term| translated_set.contains(term.text.as_str()))
    }

    /// Compare the term sets of an original text and its translation
    pub fn preservation_statistics(&self, original: &str, translated: &str) -> PreservationStatistics {
        let raw_original = self.extract_all(original);
        let total_original_terms = raw_original.len();
        let original_terms = crate::preservation::TermSet::from_terms(raw_original);
        let translated_terms = self.extract(translated);

        let original_set: HashSet<&str> = original_terms.text_set();
        let translated_set: HashSet<&str> = translated_terms.text_set();

        // Lists follow first-seen order so reports are stable
        let preserved_term_list: Vec<String> = original_terms
            .texts()
            .into_iter()
            .filter(|text| translated_set.contains(text))
            .map(str::to_string)
            .collect();
        let missing_term_list: Vec<String> = original_terms
            .texts()
            .into_iter()
            .filter(|text| !translated_set.contains(text))
            .map(str::to_string)
            .collect();
        let added_term_list: Vec<String> = translated_terms
            .texts()
            .into_iter()
            .filter(|text| !original_set.contains(text))
            .map(str::to_string)
            .collect();

        let unique_original_terms = original_terms.len();
        let preservation_rate = if unique_original_terms == 0 {
            1.0
        } else {
            preserved_term_list.len() as f64 / unique_original_terms as f64
        };

        PreservationStatistics {
            total_original_terms,
            unique_original_terms,
            preserved_terms: preserved_term_list.len(),
            missing_terms: missing_term_list.len(),
            added_terms: added_term_list.len(),
            preservation_rate,
            missing_term_list,
            added_term_list,
            preserved_term_list,
        }
    }
}
