/*!
 * Running processing statistics of one orchestrator.
 *
 * Concurrent units complete in any order; every update goes through a
 * single mutex so counters and cumulative latency stay consistent.
 */

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
struct Counters {
    total: usize,
    successful: usize,
    failed: usize,
    cache_hits: usize,
    total_time: Duration,
}

/// Point-in-time copy of the statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_translations: usize,
    pub successful_translations: usize,
    pub failed_translations: usize,
    pub cache_hits: usize,
    pub total_processing_time_ms: u64,
    pub average_processing_time_ms: f64,
    /// successful / total, 0.0 before the first unit
    pub success_rate: f64,
}

/// Shared statistics handle; clones update the same counters
#[derive(Debug, Clone, Default)]
pub struct ProcessingStatistics {
    inner: Arc<Mutex<Counters>>,
}

impl ProcessingStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, elapsed: Duration) {
        let mut counters = self.inner.lock();
        counters.total += 1;
        counters.successful += 1;
        counters.total_time += elapsed;
    }

    pub fn record_failure(&self, elapsed: Duration) {
        let mut counters = self.inner.lock();
        counters.total += 1;
        counters.failed += 1;
        counters.total_time += elapsed;
    }

    /// Count a successful unit served from the cache
    pub fn record_cache_hit(&self, elapsed: Duration) {
        let mut counters = self.inner.lock();
        counters.total += 1;
        counters.successful += 1;
        counters.cache_hits += 1;
        counters.total_time += elapsed;
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        let counters = self.inner.lock();
        let total_ms = counters.total_time.as_secs_f64() * 1000.0;
        let (average, success_rate) = if counters.total > 0 {
            (
                total_ms / counters.total as f64,
                counters.successful as f64 / counters.total as f64,
            )
        } else {
            (0.0, 0.0)
        };

        StatisticsSnapshot {
            total_translations: counters.total,
            successful_translations: counters.successful,
            failed_translations: counters.failed,
            cache_hits: counters.cache_hits,
            total_processing_time_ms: counters.total_time.as_millis() as u64,
            average_processing_time_ms: average,
            success_rate,
        }
    }

    pub fn reset(&self) {
        *self.inner.lock() = Counters::default();
    }
}
