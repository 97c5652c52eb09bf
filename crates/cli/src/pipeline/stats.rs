//! Run statistics.

use std::time::Duration;

use dispatcher::DispatchOutcome;
use observability::DispatchStats;
use tokio::task::JoinError;
use tracing::{error, warn};

use super::Processed;
use crate::error::CliError;

/// Statistics from a `run`
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Non-blank input lines
    pub lines_read: u64,

    /// Wall time of the run
    pub duration: Duration,

    /// Intake stopped by a shutdown signal
    pub interrupted: bool,

    pub dispatch: DispatchStats,
}

impl RunStats {
    /// Fold one finished task into the statistics
    pub fn record_joined(&mut self, joined: Result<Result<Processed, CliError>, JoinError>) {
        match joined {
            Ok(Ok(processed)) => self.record(&processed),
            Ok(Err(e)) => {
                warn!(error = %e, "Payload failed");
                observability::record_invocation_failed(e.stage());
                self.dispatch.record_failure(e.event_kind());
            }
            Err(e) => {
                error!(error = %e, "Payload task panicked");
                self.dispatch.record_failure(None);
            }
        }
    }

    fn record(&mut self, processed: &Processed) {
        match &processed.outcome {
            DispatchOutcome::Silent => {
                self.dispatch
                    .record_silent(processed.kind, processed.latency_ms);
            }
            DispatchOutcome::Broadcast { report, .. } => {
                self.dispatch.record_broadcast(
                    processed.kind,
                    report.delivered.len(),
                    report.failures.iter().map(|f| f.subscriber()),
                    processed.latency_ms,
                );
            }
        }
    }

    /// Events per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.dispatch.total_events as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!();
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Lines read: {}", self.lines_read);
        println!("Throughput: {:.2} events/s", self.throughput());
        if self.interrupted {
            println!("Intake interrupted by shutdown signal");
        }
        println!();
        print!("{}", self.dispatch.summary());
    }
}
