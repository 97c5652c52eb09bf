//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use super::input::{load_blueprint, open_lines};
use crate::cli::RunArgs;
use crate::pipeline::Pipeline;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");
    let blueprint = load_blueprint(&args.config)?;

    info!(
        store = %blueprint.store.path.display(),
        subscribers = blueprint.subscribers.len(),
        "Configuration loaded"
    );

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let pipeline = Pipeline::from_blueprint(&blueprint)?;
    let reader = open_lines(&args.input).await?;

    info!(
        input = %args.input.display(),
        max_in_flight = args.max_in_flight,
        "Processing payloads"
    );

    let stats = pipeline
        .run(reader, args.max_in_flight, shutdown_signal())
        .await
        .context("Run failed")?;

    stats.print_summary();

    for (name, snapshot) in pipeline.dispatcher().metrics() {
        info!(
            subscriber = %name,
            delivered = snapshot.delivered_count,
            failed = snapshot.failure_count,
            "Subscriber totals"
        );
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
