/*!
 * Batch translation processing.
 *
 * Units are independent: each runs the orchestrator pipeline in its own
 * task, bounded by a semaphore sized to the provider's rate limit. Units
 * start in submission order. A batch timeout stops waiting for stragglers;
 * their tasks are left running and their results are not collected.
 */

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use super::orchestrator::{TranslationOrchestrator, TranslationResult};

/// Progress callback receiving (completed, total)
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// One identified text block of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: String,
    pub text: String,
}

impl BatchItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Collected results of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Results in submission order; abandoned units are absent
    pub results: Vec<TranslationResult>,
    /// Ids of units still pending when the timeout fired
    pub abandoned: Vec<String>,
    pub timed_out: bool,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn result_for(&self, id: &str) -> Option<&TranslationResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

/// Batch translator fanning units out over the orchestrator
#[derive(Clone)]
pub struct BatchTranslator {
    orchestrator: TranslationOrchestrator,

    /// Shared by every batch run through this translator
    semaphore: Arc<Semaphore>,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,

    batch_timeout: Option<Duration>,

    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for BatchTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchTranslator")
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("batch_timeout", &self.batch_timeout)
            .field("has_progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(orchestrator: TranslationOrchestrator, max_concurrent_requests: usize) -> Self {
        let max_concurrent_requests = max_concurrent_requests.max(1);
        Self {
            orchestrator,
            semaphore: Arc::new(Semaphore::new(max_concurrent_requests)),
            max_concurrent_requests,
            batch_timeout: None,
            progress_callback: None,
        }
    }

    /// Stop collecting results after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch_timeout = timeout;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn orchestrator(&self) -> &TranslationOrchestrator {
        &self.orchestrator
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Translate plain texts under ids `unit-0`, `unit-1`, ...
    pub async fn translate_texts(&self, texts: &[&str], preserve_terms: bool) -> BatchOutcome {
        let items = texts
            .iter()
            .enumerate()
            .map(|(i, text)| BatchItem::new(format!("unit-{}", i), *text))
            .collect();
        self.translate_batch(items, preserve_terms).await
    }

    /// Translate independent units concurrently
    ///
    /// A failing unit only fails itself; nothing here returns an error.
    pub async fn translate_batch(&self, items: Vec<BatchItem>, preserve_terms: bool) -> BatchOutcome {
        let start = Instant::now();
        let total = items.len();
        let submitted: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        let completed = Arc::new(AtomicUsize::new(0));

        info!(
            "Translating batch of {} units ({} concurrent)",
            total, self.max_concurrent_requests
        );

        let mut collected: Vec<(usize, TranslationResult)> = Vec::with_capacity(total);
        let mut results = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let orchestrator = self.orchestrator.clone();
                let semaphore = self.semaphore.clone();
                let completed = completed.clone();
                let progress_callback = self.progress_callback.clone();

                async move {
                    let BatchItem { id, text } = item;
                    let (task_id, task_text) = (id.clone(), text.clone());

                    // The task outlives this future if the batch times out
                    let handle = tokio::spawn(async move {
                        let _permit = semaphore.acquire_owned().await.ok();
                        orchestrator.translate_block(&task_id, &task_text, preserve_terms).await
                    });

                    let result = match handle.await {
                        Ok(result) => result,
                        Err(e) => TranslationResult::interrupted(&id, &text, format!("Unit task aborted: {}", e)),
                    };

                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(callback) = &progress_callback {
                        callback(current, total);
                    }

                    (index, result)
                }
            })
            .buffer_unordered(self.max_concurrent_requests);

        let collect = async {
            while let Some(entry) = results.next().await {
                collected.push(entry);
            }
        };

        let timed_out = match self.batch_timeout {
            Some(timeout) => tokio::time::timeout(timeout, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };
        drop(results);

        // Sort results by submission index to maintain original order
        collected.sort_by_key(|(index, _)| *index);

        let finished: HashSet<usize> = collected.iter().map(|(index, _)| *index).collect();
        let abandoned: Vec<String> = submitted
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !finished.contains(index))
            .map(|(_, id)| id)
            .collect();
        let results: Vec<TranslationResult> = collected.into_iter().map(|(_, result)| result).collect();

        if timed_out {
            warn!(
                "Batch timed out after {:?}: {} of {} units abandoned",
                self.batch_timeout.unwrap_or_default(),
                abandoned.len(),
                total
            );
        }

        let outcome = BatchOutcome {
            results,
            abandoned,
            timed_out,
            elapsed: start.elapsed(),
        };

        info!(
            "Batch finished: {} succeeded, {} failed, {} abandoned in {:?}",
            outcome.successful(),
            outcome.failed(),
            outcome.abandoned.len(),
            outcome.elapsed
        );

        outcome
    }
}
