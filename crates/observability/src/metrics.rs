//! Notifier metrics
//!
//! Counters exported through the `metrics` facade, plus an in-memory
//! aggregator for end-of-run summaries.

use std::collections::HashMap;
use std::fmt;

use contracts::EventKind;
use metrics::{counter, histogram};

/// Record a trigger invocation entering the pipeline
pub fn record_event_received(kind: EventKind) {
    counter!(
        "sheet_notifier_events_received_total",
        "event_kind" => kind.to_string()
    )
    .increment(1);
}

/// Record whether the strategy produced a message
pub fn record_outcome(kind: EventKind, produced: bool) {
    let outcome = if produced { "message" } else { "silent" };
    counter!(
        "sheet_notifier_outcomes_total",
        "event_kind" => kind.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one delivery attempt
pub fn record_delivery(subscriber: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sheet_notifier_deliveries_total",
        "subscriber" => subscriber.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record an invocation that ended in a fatal error
pub fn record_invocation_failed(stage: &'static str) {
    counter!("sheet_notifier_invocation_errors_total", "stage" => stage).increment(1);
}

/// Record wall time from event intake to end of broadcast
pub fn record_dispatch_latency_ms(latency_ms: f64) {
    histogram!("sheet_notifier_dispatch_latency_ms").record(latency_ms);
}

/// Dispatch statistics aggregator
///
/// Aggregates in memory for the summary printed after a run.
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    pub total_events: u64,
    pub events_by_kind: HashMap<EventKind, u64>,
    pub messages: u64,
    pub silent: u64,
    pub failed_invocations: u64,
    pub deliveries_ok: u64,
    pub deliveries_failed: u64,
    pub failures_by_subscriber: HashMap<String, u64>,
    pub latency_ms: RunningStats,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy produced nothing
    pub fn record_silent(&mut self, kind: EventKind, latency_ms: f64) {
        self.count_event(Some(kind));
        self.silent += 1;
        self.latency_ms.push(latency_ms);
    }

    /// A message was broadcast
    pub fn record_broadcast<'a>(
        &mut self,
        kind: EventKind,
        delivered: usize,
        failed_subscribers: impl IntoIterator<Item = &'a str>,
        latency_ms: f64,
    ) {
        self.count_event(Some(kind));
        self.messages += 1;
        self.deliveries_ok += delivered as u64;
        for subscriber in failed_subscribers {
            self.deliveries_failed += 1;
            *self
                .failures_by_subscriber
                .entry(subscriber.to_string())
                .or_insert(0) += 1;
        }
        self.latency_ms.push(latency_ms);
    }

    /// The invocation failed; `kind` is unknown when the payload never parsed
    pub fn record_failure(&mut self, kind: Option<EventKind>) {
        self.count_event(kind);
        self.failed_invocations += 1;
    }

    fn count_event(&mut self, kind: Option<EventKind>) {
        self.total_events += 1;
        if let Some(kind) = kind {
            *self.events_by_kind.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn summary(&self) -> DispatchSummary {
        let attempted = self.deliveries_ok + self.deliveries_failed;
        DispatchSummary {
            total_events: self.total_events,
            created_events: self
                .events_by_kind
                .get(&EventKind::Created)
                .copied()
                .unwrap_or(0),
            edited_events: self
                .events_by_kind
                .get(&EventKind::Edited)
                .copied()
                .unwrap_or(0),
            messages: self.messages,
            silent: self.silent,
            failed_invocations: self.failed_invocations,
            deliveries_ok: self.deliveries_ok,
            deliveries_failed: self.deliveries_failed,
            delivery_failure_rate: if attempted > 0 {
                self.deliveries_failed as f64 / attempted as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_ms),
            failures_by_subscriber: self.failures_by_subscriber.clone(),
        }
    }
}

/// Run summary
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub total_events: u64,
    pub created_events: u64,
    pub edited_events: u64,
    pub messages: u64,
    pub silent: u64,
    pub failed_invocations: u64,
    pub deliveries_ok: u64,
    pub deliveries_failed: u64,
    pub delivery_failure_rate: f64,
    pub latency_ms: StatsSummary,
    pub failures_by_subscriber: HashMap<String, u64>,
}

impl fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(
            f,
            "Events: {} (created {}, edited {})",
            self.total_events, self.created_events, self.edited_events
        )?;
        writeln!(f, "Messages: {}", self.messages)?;
        writeln!(f, "Silent: {}", self.silent)?;
        writeln!(f, "Failed invocations: {}", self.failed_invocations)?;
        writeln!(
            f,
            "Deliveries: {} ok, {} failed ({:.2}%)",
            self.deliveries_ok, self.deliveries_failed, self.delivery_failure_rate
        )?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;

        if !self.failures_by_subscriber.is_empty() {
            let mut failures: Vec<_> = self.failures_by_subscriber.iter().collect();
            failures.sort();
            writeln!(f, "Failures by subscriber:")?;
            for (subscriber, count) in failures {
                writeln!(f, "  {}: {}", subscriber, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(value);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_dispatch_stats_update() {
        let mut stats = DispatchStats::new();

        stats.record_silent(EventKind::Edited, 1.0);
        stats.record_broadcast(EventKind::Created, 2, ["line_ops"], 3.0);
        stats.record_broadcast(EventKind::Edited, 1, ["line_ops", "audit"], 5.0);
        stats.record_failure(None);

        let summary = stats.summary();
        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.created_events, 1);
        assert_eq!(summary.edited_events, 2);
        assert_eq!(summary.messages, 2);
        assert_eq!(summary.silent, 1);
        assert_eq!(summary.failed_invocations, 1);
        assert_eq!(summary.deliveries_ok, 3);
        assert_eq!(summary.deliveries_failed, 3);
        assert!((summary.delivery_failure_rate - 50.0).abs() < 1e-10);
        assert_eq!(summary.failures_by_subscriber.get("line_ops"), Some(&2));
        assert_eq!(summary.latency_ms.count, 3);
    }

    #[test]
    fn test_summary_display() {
        let mut stats = DispatchStats::new();
        stats.record_broadcast(EventKind::Created, 1, ["ops"], 2.0);

        let output = stats.summary().to_string();
        assert!(output.contains("Events: 1 (created 1, edited 0)"));
        assert!(output.contains("1 ok, 1 failed (50.00%)"));
        assert!(output.contains("  ops: 1"));
    }

    #[test]
    fn test_recorders_without_installed_exporter() {
        // The facade is a no-op until a recorder is installed
        record_event_received(EventKind::Created);
        record_outcome(EventKind::Created, true);
        record_delivery("ops", false);
        record_invocation_failed("ingestion");
        record_dispatch_latency_ms(1.5);
    }
}
