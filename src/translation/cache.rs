/*!
 * Translation caching functionality.
 *
 * Content-addressed cache of successful unit results: the key is the
 * SHA-256 of the source text and language pair, and entries are evicted
 * least-recently-used once the capacity is reached.
 */

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use super::orchestrator::TranslationResult;

/// Default number of cached results
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Stable content hash of a source text and language pair
pub fn cache_key(source_text: &str, source_language: &str, target_language: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_language.as_bytes());
    hasher.update([0u8]);
    hasher.update(target_language.as_bytes());
    hasher.update([0u8]);
    hasher.update(source_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, TranslationResult>,
    /// Keys from least to most recently used
    recency: VecDeque<String>,
    hits: usize,
    misses: usize,
}

impl CacheState {
    fn touch(&mut self, key: &str) {
        if let Some(position) = self.recency.iter().position(|k| k == key) {
            if let Some(existing) = self.recency.remove(position) {
                self.recency.push_back(existing);
            }
        }
    }
}

/// Hit/miss counters and fill level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub entries: usize,
    pub capacity: usize,
}

/// Bounded LRU cache of translation results
#[derive(Debug, Clone)]
pub struct TranslationCache {
    /// Shared between clones
    state: Arc<RwLock<CacheState>>,
    capacity: usize,
}

impl TranslationCache {
    /// Create a cache holding at most `capacity` results
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a cached result, marking it most recently used
    pub fn get(&self, source_text: &str, source_language: &str, target_language: &str) -> Option<TranslationResult> {
        let key = cache_key(source_text, source_language, target_language);
        let mut state = self.state.write();

        match state.entries.get(&key).cloned() {
            Some(result) => {
                state.hits += 1;
                state.touch(&key);
                debug!(
                    "Cache hit for '{}' ({} -> {})",
                    truncate_text(source_text, 30),
                    source_language,
                    target_language
                );
                Some(result)
            }
            None => {
                state.misses += 1;
                debug!(
                    "Cache miss for '{}' ({} -> {})",
                    truncate_text(source_text, 30),
                    source_language,
                    target_language
                );
                None
            }
        }
    }

    /// Store a successful result; failed results are ignored
    pub fn store(&self, source_language: &str, target_language: &str, result: &TranslationResult) {
        if !result.success {
            return;
        }

        let key = cache_key(&result.original_text, source_language, target_language);
        let mut state = self.state.write();

        if state.entries.insert(key.clone(), result.clone()).is_some() {
            state.touch(&key);
        } else {
            state.recency.push_back(key);
        }

        while state.entries.len() > self.capacity {
            match state.recency.pop_front() {
                Some(evicted) => {
                    state.entries.remove(&evicted);
                    debug!("Evicted cached translation {}", &evicted[..12.min(evicted.len())]);
                }
                None => break,
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        let total = state.hits + state.misses;
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            hit_rate: if total > 0 { state.hits as f64 / total as f64 } else { 0.0 },
            entries: state.entries.len(),
            capacity: self.capacity,
        }
    }

    /// Clear entries and counters
    pub fn clear(&self) {
        let mut state = self.state.write();
        *state = CacheState::default();
        debug!("Translation cache cleared");
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
