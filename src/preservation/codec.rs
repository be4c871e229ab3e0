/*!
 * Reversible masking of protected terms.
 *
 * Each distinct term string gets a `[KEEP:NNNN]` token. Masking replaces
 * occurrences in the original text, longest term first, and never rescans a
 * region that has already been claimed by a longer term. Restoring accepts
 * the token shapes translators commonly produce (full-width brackets and
 * colons, stray inner spaces) and leaves unknown tokens untouched.
 *
 * When the source text already contains token-shaped literals, the map
 * switches to a numbered marker (`[KEEP1:NNNN]`, `[KEEP2:NNNN]`, ...) that does
 * not occur in the text, so those literals pass through masking and
 * restoring unchanged.
 */

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::extractor::TermSet;

/// Literal marker used inside protection tokens
pub const TOKEN_MARKER: &str = "KEEP";

/// Token pattern accepted by `restore`
pub(crate) static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[［]\s*KEEP(?P<generation>\d*)\s*[:：]\s*(?P<index>\d{4,})\s*[\]］]")
        .expect("Invalid token regex")
});

/// Marker suffix for a generation: none for 0, the number otherwise
fn generation_suffix(generation: u32) -> String {
    if generation == 0 { String::new() } else { generation.to_string() }
}

/// Format the token for a marker generation and map index
pub fn format_token(generation: u32, index: usize) -> String {
    format!("[{}{}:{:04}]", TOKEN_MARKER, generation_suffix(generation), index)
}

/// Lowest marker generation with no token-shaped occurrence in `text`
fn free_generation(text: &str) -> u32 {
    let taken: HashSet<&str> = TOKEN_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.name("generation").map(|m| m.as_str()))
        .collect();

    let mut generation = 0;
    while taken.contains(generation_suffix(generation).as_str()) {
        generation += 1;
    }
    generation
}

/// One token/term pair of a preservation map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreservationEntry {
    pub token: String,
    pub term: String,
}

/// Ordered token -> term mapping owned by one translation unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreservationMap {
    entries: Vec<PreservationEntry>,
    /// Entry indices sorted by descending term length, computed once
    mask_order: Vec<usize>,
    /// Marker generation of every token in this map
    #[serde(default)]
    generation: u32,
}

impl PreservationMap {
    /// A map that masks nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in token index order
    pub fn entries(&self) -> &[PreservationEntry] {
        &self.entries
    }

    /// Entries in the order masking applies them (longest term first)
    pub fn mask_order(&self) -> impl Iterator<Item = &PreservationEntry> {
        self.mask_order.iter().map(|&idx| &self.entries[idx])
    }

    pub fn token_for(&self, term: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.term == term)
            .map(|entry| entry.token.as_str())
    }

    pub fn term_for(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.token == token)
            .map(|entry| entry.term.as_str())
    }

    /// Marker generation used by this map's tokens (0 = plain `KEEP`)
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn term_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.term.as_str())
    }

    /// Map index of a token match, if it carries this map's marker
    fn own_index(&self, caps: &Captures) -> Option<usize> {
        let generation = caps.name("generation").map_or("", |m| m.as_str());
        if generation != generation_suffix(self.generation) {
            return None;
        }
        caps.name("index")?.as_str().parse().ok()
    }
}

/// Stateless mask/restore codec
#[derive(Debug, Clone, Copy, Default)]
pub struct PreservationCodec;

impl PreservationCodec {
    pub fn new() -> Self {
        Self
    }

    /// Assign one token per distinct term string of `text`, in extraction
    /// order, using a marker generation that `text` does not already contain
    pub fn build_map(&self, text: &str, terms: &TermSet) -> PreservationMap {
        let generation = free_generation(text);
        if generation > 0 {
            debug!("Source text contains protection tokens, using marker generation {}", generation);
        }

        let entries: Vec<PreservationEntry> = terms
            .iter()
            .enumerate()
            .map(|(index, term)| PreservationEntry {
                token: format_token(generation, index),
                term: term.text.clone(),
            })
            .collect();

        let mut mask_order: Vec<usize> = (0..entries.len()).collect();
        // Stable sort keeps extraction order among equal lengths
        mask_order.sort_by(|&a, &b| entries[b].term.len().cmp(&entries[a].term.len()));

        PreservationMap { entries, mask_order, generation }
    }

    /// Replace every term occurrence with its token
    pub fn mask(&self, text: &str, map: &PreservationMap) -> String {
        if map.is_empty() || text.is_empty() {
            return text.to_string();
        }

        // (start, end, entry index) regions of the original text
        let mut claims: Vec<(usize, usize, usize)> = Vec::new();
        for &index in &map.mask_order {
            let term = &map.entries[index].term;
            if term.is_empty() {
                continue;
            }
            for (start, _) in text.match_indices(term.as_str()) {
                let end = start + term.len();
                let free = claims
                    .iter()
                    .all(|&(claimed_start, claimed_end, _)| end <= claimed_start || start >= claimed_end);
                if free {
                    claims.push((start, end, index));
                }
            }
        }
        claims.sort_unstable_by_key(|&(start, _, _)| start);

        let mut masked = String::with_capacity(text.len());
        let mut cursor = 0;
        for (start, end, index) in &claims {
            masked.push_str(&text[cursor..*start]);
            masked.push_str(&map.entries[*index].token);
            cursor = *end;
        }
        masked.push_str(&text[cursor..]);

        debug!("Masked {} occurrences of {} protected terms", claims.len(), map.len());
        masked
    }

    /// Replace every known token of the map's generation with its term; never fails
    pub fn restore(&self, text: &str, map: &PreservationMap) -> String {
        if map.is_empty() {
            return text.to_string();
        }

        TOKEN_REGEX
            .replace_all(text, |caps: &Captures| {
                map.own_index(caps)
                    .and_then(|index| map.term_at(index))
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Tokens of the map that do not appear in a text
    pub fn missing_tokens<'a>(&self, text: &str, map: &'a PreservationMap) -> Vec<&'a str> {
        let present: HashSet<usize> = TOKEN_REGEX
            .captures_iter(text)
            .filter_map(|caps| map.own_index(&caps))
            .collect();

        map.entries
            .iter()
            .enumerate()
            .filter(|(index, _)| !present.contains(index))
            .map(|(_, entry)| entry.token.as_str())
            .collect()
    }
}
