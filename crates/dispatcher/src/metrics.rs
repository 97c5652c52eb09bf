//! Subscriber metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single subscriber
#[derive(Debug, Default)]
pub struct SubscriberMetrics {
    /// Total successful deliveries
    delivered_count: AtomicU64,
    /// Total failed deliveries (transport or rejected)
    failure_count: AtomicU64,
}

impl SubscriberMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered_count(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            delivered_count: self.delivered_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of subscriber metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub delivered_count: u64,
    pub failure_count: u64,
}
