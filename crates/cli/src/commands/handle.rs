//! `handle` command implementation.

use anyhow::{Context, Result};
use dispatcher::{DispatchOutcome, OutcomeSummary};
use serde::Serialize;
use tracing::info;

use super::input::{load_blueprint, read_all};
use crate::cli::HandleArgs;
use crate::pipeline::Pipeline;

#[derive(Serialize)]
struct HandleResult {
    event_kind: String,
    #[serde(flatten)]
    outcome: OutcomeSummary,
}

/// Execute the `handle` command
///
/// Fatal errors exit non-zero. Subscribers that missed the message are
/// reported but do not fail the command.
pub async fn run_handle(args: &HandleArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    let pipeline = Pipeline::from_blueprint(&blueprint)?;

    let payload = read_all(&args.event).await?;
    let processed = pipeline
        .process(&payload)
        .await
        .context("Failed to handle trigger")?;

    info!(
        event_kind = %processed.kind,
        latency_ms = processed.latency_ms,
        "Trigger handled"
    );

    if args.json {
        let result = HandleResult {
            event_kind: processed.kind.to_string(),
            outcome: OutcomeSummary::from(&processed.outcome),
        };
        let json =
            serde_json::to_string_pretty(&result).context("Failed to serialize outcome")?;
        println!("{}", json);
    } else {
        print_outcome(&processed.outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Silent => println!("No notification (event does not match the rule)"),
        DispatchOutcome::Broadcast { message, report } => {
            println!("Message: {}", message);
            println!(
                "Delivered to {} of {} subscriber(s)",
                report.delivered.len(),
                report.attempted()
            );
            for failure in &report.failures {
                println!("  ✗ {}", failure);
            }
        }
    }
}
