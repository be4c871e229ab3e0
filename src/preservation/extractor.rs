/*!
 * Technical term extraction.
 *
 * The extractor applies every rule of the ordered rule table to the full
 * text. Matches of different rules may overlap (a version inside a product
 * release string); both are kept. Deduplication happens by term string when
 * a `TermSet` is built.
 */

use std::collections::{BTreeMap, HashSet};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patterns::{is_well_formed, TermCategory, TERM_RULES};

/// Texts shorter than this (in characters, after trimming) yield no terms
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 3;

/// Blocks with a higher share of technical characters are not worth translating
pub const MAX_TECHNICAL_RATIO: f64 = 0.8;

/// Short blocks (in characters) that contain any term are treated as identifiers
const SHORT_IDENTIFIER_LENGTH: usize = 10;

/// A protected term found in a source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechnicalTerm {
    /// The matched text
    pub text: String,
    /// Category of the rule that matched
    pub category: TermCategory,
    /// Byte offsets `(start, end)` in the source text
    pub span: (usize, usize),
}

/// Distinct terms of one text, keyed by term string, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermSet {
    terms: Vec<TechnicalTerm>,
}

impl TermSet {
    /// Build a set from raw matches, keeping the first occurrence of each string
    pub fn from_terms(terms: impl IntoIterator<Item = TechnicalTerm>) -> Self {
        let mut seen = HashSet::new();
        let terms = terms
            .into_iter()
            .filter(|term| seen.insert(term.text.clone()))
            .collect();
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TechnicalTerm> {
        self.terms.iter()
    }

    /// Whether a term with exactly this text is present
    pub fn contains(&self, text: &str) -> bool {
        self.terms.iter().any(|term| term.text == text)
    }

    /// Term strings in first-seen order
    pub fn texts(&self) -> Vec<&str> {
        self.terms.iter().map(|term| term.text.as_str()).collect()
    }

    /// Term strings as a set, for containment checks
    pub fn text_set(&self) -> HashSet<&str> {
        self.terms.iter().map(|term| term.text.as_str()).collect()
    }

    /// Group term strings by category
    pub fn by_category(&self) -> BTreeMap<TermCategory, Vec<String>> {
        let mut grouped: BTreeMap<TermCategory, Vec<String>> = BTreeMap::new();
        for term in &self.terms {
            grouped.entry(term.category).or_default().push(term.text.clone());
        }
        grouped
    }
}

impl IntoIterator for TermSet {
    type Item = TechnicalTerm;
    type IntoIter = std::vec::IntoIter<TechnicalTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a TechnicalTerm;
    type IntoIter = std::slice::Iter<'a, TechnicalTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

/// Result of checking that matched identifiers are well formed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Number of terms checked
    pub checked: usize,
    /// Terms that failed their category's shape check
    pub malformed: Vec<TechnicalTerm>,
}

impl IntegrityReport {
    pub fn is_intact(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// Pattern-based technical term extractor
#[derive(Debug, Clone)]
pub struct TermExtractor {
    min_text_length: usize,
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TermExtractor {
    pub fn new() -> Self {
        Self::with_min_length(DEFAULT_MIN_TEXT_LENGTH)
    }

    /// Create an extractor with a custom minimum text length
    pub fn with_min_length(min_text_length: usize) -> Self {
        Self { min_text_length }
    }

    pub fn min_text_length(&self) -> usize {
        self.min_text_length
    }

    fn too_short(&self, text: &str) -> bool {
        text.trim().chars().count() < self.min_text_length
    }

    /// All matches of all rules, in rule priority order then position.
    ///
    /// Duplicates are kept, so the length of the result is the raw term count.
    pub fn extract_all(&self, text: &str) -> Vec<TechnicalTerm> {
        if self.too_short(text) {
            return Vec::new();
        }

        let mut terms = Vec::new();
        for rule in TERM_RULES.iter() {
            for caps in rule.regex.captures_iter(text) {
                if let Some(m) = caps.get(rule.group) {
                    if m.as_str().is_empty() {
                        continue;
                    }
                    terms.push(TechnicalTerm {
                        text: m.as_str().to_string(),
                        category: rule.category,
                        span: (m.start(), m.end()),
                    });
                }
            }
        }

        debug!("Extracted {} raw technical terms", terms.len());
        terms
    }

    /// Distinct terms of a text
    pub fn extract(&self, text: &str) -> TermSet {
        TermSet::from_terms(self.extract_all(text))
    }

    /// Share of the text's characters covered by at least one term (0.0 - 1.0)
    pub fn technical_ratio(&self, text: &str) -> f64 {
        let total = text.chars().count();
        if total == 0 {
            return 0.0;
        }

        let mut spans: Vec<(usize, usize)> = self.extract_all(text).iter().map(|t| t.span).collect();
        spans.sort_unstable();

        // Merge overlapping spans and count covered characters
        let mut covered = 0usize;
        let mut current: Option<(usize, usize)> = None;
        for (start, end) in spans {
            match current {
                Some((cur_start, cur_end)) if start <= cur_end => {
                    current = Some((cur_start, cur_end.max(end)));
                }
                Some((cur_start, cur_end)) => {
                    covered += text[cur_start..cur_end].chars().count();
                    current = Some((start, end));
                }
                None => current = Some((start, end)),
            }
        }
        if let Some((cur_start, cur_end)) = current {
            covered += text[cur_start..cur_end].chars().count();
        }

        (covered as f64 / total as f64).min(1.0)
    }

    /// Decide whether a block carries enough prose to be sent for translation
    pub fn is_translatable(&self, text: &str) -> bool {
        static BARE_VALUE: Lazy<Vec<Regex>> = Lazy::new(|| {
            [
                r"^\d+(?:\.\d+)*$",
                r"(?i)^[A-Z]{2,}[-_]?\d+$",
                r"(?i)^https?://\S*$",
                r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("Invalid bare value regex"))
            .collect()
        });

        let trimmed = text.trim();
        if trimmed.is_empty() || self.too_short(trimmed) {
            return false;
        }

        if trimmed.chars().count() < SHORT_IDENTIFIER_LENGTH && !self.extract_all(trimmed).is_empty() {
            return false;
        }

        if self.technical_ratio(trimmed) > MAX_TECHNICAL_RATIO {
            return false;
        }

        !BARE_VALUE.iter().any(|re| re.is_match(trimmed))
    }

    /// Check that identifiers with a strict shape (CVE IDs, CVSS labels,
    /// URLs, e-mails) are well formed
    pub fn category_integrity(&self, text: &str) -> IntegrityReport {
        let terms = self.extract(text);
        let malformed = terms
            .iter()
            .filter(|term| !is_well_formed(term.category, &term.text))
            .cloned()
            .collect();

        IntegrityReport {
            checked: terms.len(),
            malformed,
        }
    }
}
