/*!
 * Document-level translation.
 *
 * A `DocumentProcessor` turns document bytes into identified text blocks and
 * back; the translator never sees the byte layout. `DocumentTranslator` fans
 * the translatable blocks out through a `BatchTranslator` and rebuilds the
 * document, keeping the original text of every block that failed or was
 * abandoned.
 */

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{DocumentError, TranslationError};

use super::batch::{BatchItem, BatchTranslator};
use super::orchestrator::TranslationResult;

/// One identified block of document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: String,
    pub text: String,
}

/// Converts between a document format and text blocks
pub trait DocumentProcessor: Send + Sync + Debug {
    /// Whether this processor handles the file
    fn can_process(&self, path: &Path) -> bool;

    /// Ordered text blocks of a document
    fn extract_text_blocks(&self, content: &[u8]) -> Result<Vec<TextBlock>, DocumentError>;

    /// Rebuild the document with translated blocks; unknown ids keep their text
    fn reconstruct(&self, content: &[u8], translations: &HashMap<String, String>) -> Result<Vec<u8>, DocumentError>;
}

/// One or more blank lines between paragraphs
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("Invalid paragraph regex"));

/// UTF-8 text documents, one block per paragraph
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextProcessor;

impl PlainTextProcessor {
    pub fn new() -> Self {
        Self
    }

    fn decode(content: &[u8]) -> Result<&str, DocumentError> {
        std::str::from_utf8(content)
            .map_err(|e| DocumentError::Extraction(format!("Document is not valid UTF-8: {}", e)))
    }

    /// Paragraphs and the separators that follow each of them
    fn split(text: &str) -> Vec<(&str, &str)> {
        let mut pieces = Vec::new();
        let mut last = 0;
        for separator in PARAGRAPH_BREAK.find_iter(text) {
            pieces.push((&text[last..separator.start()], separator.as_str()));
            last = separator.end();
        }
        pieces.push((&text[last..], ""));
        pieces
    }

    fn block_id(index: usize) -> String {
        format!("p{}", index)
    }
}

impl DocumentProcessor for PlainTextProcessor {
    fn can_process(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => matches!(ext.to_lowercase().as_str(), "txt" | "text" | "md"),
            None => true,
        }
    }

    fn extract_text_blocks(&self, content: &[u8]) -> Result<Vec<TextBlock>, DocumentError> {
        let text = Self::decode(content)?;
        Ok(Self::split(text)
            .into_iter()
            .enumerate()
            .filter(|(_, (paragraph, _))| !paragraph.trim().is_empty())
            .map(|(index, (paragraph, _))| TextBlock {
                id: Self::block_id(index),
                text: paragraph.to_string(),
            })
            .collect())
    }

    fn reconstruct(&self, content: &[u8], translations: &HashMap<String, String>) -> Result<Vec<u8>, DocumentError> {
        let text = Self::decode(content).map_err(|e| DocumentError::Reconstruction(e.to_string()))?;
        let mut output = String::with_capacity(text.len() * 2);
        for (index, (paragraph, separator)) in Self::split(text).into_iter().enumerate() {
            match translations.get(&Self::block_id(index)) {
                Some(translated) => output.push_str(translated),
                None => output.push_str(paragraph),
            }
            output.push_str(separator);
        }
        Ok(output.into_bytes())
    }
}

/// Counters of one document translation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total_blocks: usize,
    pub translatable_blocks: usize,
    pub successful_blocks: usize,
    pub failed_blocks: usize,
    pub abandoned_blocks: usize,
    /// Validated blocks whose similarity fell below the quality threshold
    pub below_threshold_blocks: usize,
    pub processing_time_ms: u64,
    /// Mean similarity of the validated blocks
    pub average_similarity: Option<f64>,
}

/// Output of `DocumentTranslator::translate_document`
#[derive(Debug, Clone)]
pub struct DocumentTranslation {
    pub content: Vec<u8>,
    pub results: Vec<TranslationResult>,
    pub stats: DocumentStats,
}

/// Translates whole documents block by block
#[derive(Debug, Clone)]
pub struct DocumentTranslator {
    batch: BatchTranslator,
    processor: Arc<dyn DocumentProcessor>,
}

impl DocumentTranslator {
    pub fn new(batch: BatchTranslator, processor: Arc<dyn DocumentProcessor>) -> Self {
        Self { batch, processor }
    }

    pub fn processor(&self) -> &Arc<dyn DocumentProcessor> {
        &self.processor
    }

    /// Translate every translatable block of a document
    pub async fn translate_document(
        &self,
        content: &[u8],
        preserve_terms: bool,
    ) -> Result<DocumentTranslation, TranslationError> {
        let start = Instant::now();
        let blocks = self.processor.extract_text_blocks(content)?;
        let extractor = self.batch.orchestrator().extractor();

        let items: Vec<BatchItem> = blocks
            .iter()
            .filter(|block| extractor.is_translatable(&block.text))
            .map(|block| BatchItem::new(block.id.clone(), block.text.clone()))
            .collect();

        info!(
            "Document has {} blocks, {} translatable",
            blocks.len(),
            items.len()
        );

        let translatable_blocks = items.len();
        let originals: HashMap<String, String> = items
            .iter()
            .map(|item| (item.id.clone(), item.text.clone()))
            .collect();

        let outcome = self.batch.translate_batch(items, preserve_terms).await;

        let mut translations = HashMap::with_capacity(translatable_blocks);
        for result in &outcome.results {
            let text = if result.success {
                result.translated_text.clone()
            } else {
                warn!("Block {} kept untranslated: {}", result.id, result.error.as_deref().unwrap_or("unknown error"));
                result.original_text.clone()
            };
            translations.insert(result.id.clone(), text);
        }
        for id in &outcome.abandoned {
            if let Some(original) = originals.get(id) {
                translations.insert(id.clone(), original.clone());
            }
        }

        let content = self.processor.reconstruct(content, &translations)?;

        let scores: Vec<f64> = outcome
            .results
            .iter()
            .filter_map(|r| r.similarity_score())
            .collect();
        let average_similarity = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        let below_threshold_blocks = outcome
            .results
            .iter()
            .filter(|r| r.success)
            .filter_map(|r| r.validation.as_ref().and_then(|v| v.result()))
            .filter(|v| !v.meets_threshold)
            .count();

        let stats = DocumentStats {
            total_blocks: blocks.len(),
            translatable_blocks,
            successful_blocks: outcome.successful(),
            failed_blocks: outcome.failed(),
            abandoned_blocks: outcome.abandoned.len(),
            below_threshold_blocks,
            processing_time_ms: start.elapsed().as_millis() as u64,
            average_similarity,
        };

        info!(
            "Document translated: {}/{} blocks succeeded",
            stats.successful_blocks, stats.translatable_blocks
        );

        Ok(DocumentTranslation {
            content,
            results: outcome.results,
            stats,
        })
    }
}
