use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    requests_sent: AtomicU64,
    tokens_refreshed: AtomicU64,
    retry_count: AtomicU64,
    tokens_skipped: AtomicU64,
}

/// Counters for one refresh run. Clones share the same counters.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_sent: u64,
    pub tokens_refreshed: u64,
    pub retry_count: u64,
    pub tokens_skipped: u64,
}

impl RunMetrics {
    pub fn new() -> Self {
        RunMetrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_requests(&self, count: u64) {
        self.inner.requests_sent.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_refreshed(&self, count: u64) {
        self.inner
            .tokens_refreshed
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_retries(&self, count: u64) {
        self.inner.retry_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_skipped(&self, count: u64) {
        self.inner.tokens_skipped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_sent: self.inner.requests_sent.load(Ordering::Relaxed),
            tokens_refreshed: self.inner.tokens_refreshed.load(Ordering::Relaxed),
            retry_count: self.inner.retry_count.load(Ordering::Relaxed),
            tokens_skipped: self.inner.tokens_skipped.load(Ordering::Relaxed),
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}
