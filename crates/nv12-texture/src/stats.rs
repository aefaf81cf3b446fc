use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by a converter as it compiles, submits and fails.
#[derive(Debug, Default)]
pub struct ConverterStats {
    compilations: AtomicU64,
    cache_hits: AtomicU64,
    submissions: AtomicU64,
    conversions: AtomicU64,
    failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Pipelines successfully built from the kernel source.
    pub compilations: u64,
    pub cache_hits: u64,
    /// Command buffers handed to a queue.
    pub submissions: u64,
    /// Conversions that returned an output texture.
    pub conversions: u64,
    pub failures: u64,
}

impl ConverterStats {
    pub(crate) fn record_compilation(&self) {
        self.compilations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_conversion(&self) {
        self.conversions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn compilations(&self) -> u64 {
        self.compilations.load(Ordering::Relaxed)
    }

    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            compilations: self.compilations(),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            submissions: self.submissions(),
            conversions: self.conversions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
