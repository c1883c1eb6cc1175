//! Resolver metrics and observability module.
//!
//! Counts physical file reads, cache hits and misses for the two cached
//! lists, and filter hook invocations. Each resolver owns its own counters.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one resolver instance.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    /// Number of files read from disk (including ones that were missing)
    file_reads: AtomicUsize,

    /// Number of `list_codes` calls answered from cache
    code_cache_hits: AtomicUsize,

    /// Number of `list_codes` calls that went to disk
    code_cache_misses: AtomicUsize,

    /// Number of `list` calls answered from cache
    list_cache_hits: AtomicUsize,

    /// Number of `list` calls that went to disk
    list_cache_misses: AtomicUsize,

    /// Number of times the namespace filter ran
    filter_calls: AtomicUsize,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_file_read(&self) {
        self.file_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_code_cache_hit(&self) {
        self.code_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_code_cache_miss(&self) {
        self.code_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_list_cache_hit(&self) {
        self.list_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_list_cache_miss(&self) {
        self.list_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filter_call(&self) {
        self.filter_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current file read count.
    pub fn file_reads(&self) -> usize {
        self.file_reads.load(Ordering::Relaxed)
    }

    pub fn code_cache_hits(&self) -> usize {
        self.code_cache_hits.load(Ordering::Relaxed)
    }

    pub fn code_cache_misses(&self) -> usize {
        self.code_cache_misses.load(Ordering::Relaxed)
    }

    pub fn list_cache_hits(&self) -> usize {
        self.list_cache_hits.load(Ordering::Relaxed)
    }

    pub fn list_cache_misses(&self) -> usize {
        self.list_cache_misses.load(Ordering::Relaxed)
    }

    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let code_hits = self.code_cache_hits();
        let code_misses = self.code_cache_misses();
        let list_hits = self.list_cache_hits();
        let list_misses = self.list_cache_misses();

        MetricsReport {
            file_reads: self.file_reads(),
            code_cache_hits: code_hits,
            code_cache_misses: code_misses,
            code_cache_hit_rate: hit_rate(code_hits, code_misses),
            list_cache_hits: list_hits,
            list_cache_misses: list_misses,
            list_cache_hit_rate: hit_rate(list_hits, list_misses),
            filter_calls: self.filter_calls(),
        }
    }

    /// Reset all counters to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.file_reads.store(0, Ordering::Relaxed);
        self.code_cache_hits.store(0, Ordering::Relaxed);
        self.code_cache_misses.store(0, Ordering::Relaxed);
        self.list_cache_hits.store(0, Ordering::Relaxed);
        self.list_cache_misses.store(0, Ordering::Relaxed);
        self.filter_calls.store(0, Ordering::Relaxed);
    }
}

fn hit_rate(hits: usize, misses: usize) -> f64 {
    let total = hits + misses;
    if total > 0 {
        (hits as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Snapshot of resolver counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub file_reads: usize,
    pub code_cache_hits: usize,
    pub code_cache_misses: usize,

    /// Code-list cache hit rate as a percentage (0-100)
    pub code_cache_hit_rate: f64,

    pub list_cache_hits: usize,
    pub list_cache_misses: usize,

    /// Language-list cache hit rate as a percentage (0-100)
    pub list_cache_hit_rate: f64,

    pub filter_calls: usize,
}
