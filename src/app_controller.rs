use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::preservation::{TermCategory, TermExtractor};
use crate::providers::openai::OpenAIClient;
use crate::providers::{EmbeddingProvider, Translator};
use crate::translation::{
    BatchTranslator, DocumentProcessor, DocumentStats, DocumentTranslator, OrchestratorOptions,
    PlainTextProcessor, StatisticsSnapshot, TranslationCache, TranslationOrchestrator, TranslationResult,
};
use crate::validation::SemanticValidator;

// @module: Application controller for advisory translation

/// JSON report written next to a translated document
#[derive(Debug, Serialize)]
pub struct TranslationReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_language: String,
    pub target_language: String,
    pub stats: DocumentStats,
    pub statistics: StatisticsSnapshot,
    pub results: Vec<TranslationResult>,
}

/// Options of one `run`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Defaults to `<stem>.<target>.<ext>` next to the input
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub preserve_terms: bool,
    pub show_progress: bool,
}

/// Main application controller for advisory translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    translator: Arc<dyn Translator>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    processor: Arc<dyn DocumentProcessor>,
}

impl Controller {
    // @method: Create a controller talking to the configured OpenAI/Azure service
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let client = Arc::new(OpenAIClient::from_config(&config));
        let embedder: Option<Arc<dyn EmbeddingProvider>> = if config.validation.enabled {
            Some(client.clone())
        } else {
            None
        };

        Ok(Self::with_providers(config, client, embedder))
    }

    /// Create a controller around explicit providers
    pub fn with_providers(
        config: Config,
        translator: Arc<dyn Translator>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        Self {
            config,
            translator,
            embedder,
            processor: Arc::new(PlainTextProcessor::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Assemble the orchestrator described by the configuration
    pub fn build_orchestrator(&self) -> TranslationOrchestrator {
        let mut orchestrator = TranslationOrchestrator::new(
            self.translator.clone(),
            OrchestratorOptions::from_config(&self.config),
        )
        .with_extractor(TermExtractor::with_min_length(self.config.preservation.min_text_length));

        if let Some(embedder) = &self.embedder {
            if self.config.validation.enabled {
                orchestrator = orchestrator
                    .with_validator(SemanticValidator::from_config(embedder.clone(), &self.config.validation));
            }
        }
        if self.config.cache.enabled {
            orchestrator = orchestrator.with_cache(TranslationCache::new(self.config.cache.capacity));
        }
        orchestrator
    }

    fn build_batch(&self, orchestrator: TranslationOrchestrator) -> BatchTranslator {
        BatchTranslator::new(orchestrator, self.config.translation.concurrent_requests)
            .with_timeout(self.config.translation.batch_timeout_secs.map(Duration::from_secs))
    }

    /// Default output path: `advisory.txt` becomes `advisory.ja.txt`
    pub fn output_path(input: &Path, target_language: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "translation".to_string());
        let file_name = match input.extension() {
            Some(ext) => format!("{}.{}.{}", stem, target_language, ext.to_string_lossy()),
            None => format!("{}.{}", stem, target_language),
        };
        input.with_file_name(file_name)
    }

    /// Protected terms of a text grouped by category
    pub fn list_terms(config: &Config, text: &str) -> BTreeMap<TermCategory, Vec<String>> {
        TermExtractor::with_min_length(config.preservation.min_text_length)
            .extract(text)
            .by_category()
    }

    /// Translate one document file
    pub async fn run(&self, input: &Path, options: RunOptions) -> Result<TranslationReport> {
        if !input.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }
        if !self.processor.can_process(input) {
            return Err(anyhow!("Unsupported input file: {:?}", input));
        }

        let content = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
        let output = options
            .output
            .clone()
            .unwrap_or_else(|| Self::output_path(input, &self.config.target_language));

        info!(
            "cve-translator: {} - {} ({} -> {})",
            self.config.translation.provider.display_name(),
            self.config.translation.model,
            self.config.source_language,
            self.config.target_language
        );

        let orchestrator = self.build_orchestrator();
        let mut batch = self.build_batch(orchestrator.clone());

        let progress_bar = if options.show_progress {
            let blocks = self.processor.extract_text_blocks(&content)?;
            let bar = ProgressBar::new(blocks.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({percent}%) {msg} {eta}")
                .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style.progress_chars("=>-"));
            bar.set_message("Translating");

            let pb = bar.clone();
            batch = batch.with_progress(Arc::new(move |completed: usize, total: usize| {
                pb.set_length(total as u64);
                pb.set_position(completed as u64);
            }));
            Some(bar)
        } else {
            None
        };

        let translation = DocumentTranslator::new(batch, self.processor.clone())
            .translate_document(&content, options.preserve_terms)
            .await?;

        if let Some(bar) = progress_bar {
            bar.finish_and_clear();
        }

        std::fs::write(&output, &translation.content)
            .with_context(|| format!("Failed to write {:?}", output))?;

        let stats = translation.stats;
        if stats.failed_blocks > 0 || stats.abandoned_blocks > 0 {
            warn!(
                "{} blocks failed and {} were abandoned; their original text was kept",
                stats.failed_blocks, stats.abandoned_blocks
            );
        }
        let missing: usize = translation.results.iter().filter(|r| r.success && !r.terms_preserved).count();
        if missing > 0 {
            warn!("{} blocks lost technical terms, review them manually", missing);
        }
        if stats.below_threshold_blocks > 0 {
            warn!(
                "{} blocks scored below the quality threshold {}, review them manually",
                stats.below_threshold_blocks, self.config.validation.quality_threshold
            );
        }
        if let Some(score) = stats.average_similarity {
            info!("Average semantic similarity: {:.3}", score);
        }
        info!("Success: {:?} ({} ms)", output, stats.processing_time_ms);

        let report = TranslationReport {
            input: input.to_path_buf(),
            output,
            source_language: self.config.source_language.clone(),
            target_language: self.config.target_language.clone(),
            stats,
            statistics: orchestrator.statistics(),
            results: translation.results,
        };

        if let Some(report_path) = &options.report {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            std::fs::write(report_path, json)
                .with_context(|| format!("Failed to write report {:?}", report_path))?;
            info!("Report written to {:?}", report_path);
        }

        Ok(report)
    }
}
