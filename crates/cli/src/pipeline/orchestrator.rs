//! Pipeline orchestrator - wires store, normalizer and dispatcher together.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use contracts::{EventKind, NotifierBlueprint};
use dispatcher::{DispatchOutcome, Dispatcher, DispatcherBuilder};
use ingestion::EventNormalizer;
use store::WorkbookStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::RunStats;
use crate::error::{CliError, Result};

/// One processed trigger
#[derive(Debug)]
pub struct Processed {
    pub kind: EventKind,
    pub outcome: DispatchOutcome,
    pub latency_ms: f64,
}

/// Shared pipeline; cheap to clone into tasks
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<WorkbookStore>,
    dispatcher: Arc<Dispatcher>,
}

impl Pipeline {
    pub fn new(store: Arc<WorkbookStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Load the workbook and build the dispatcher described by a blueprint
    #[instrument(name = "pipeline_from_blueprint", skip(blueprint))]
    pub fn from_blueprint(blueprint: &NotifierBlueprint) -> Result<Self> {
        let store = load_store(&blueprint.store.path)?;

        let registry =
            strategy::default_registry(&blueprint.rules, blueprint.templates.clone())?;
        let dispatcher = DispatcherBuilder::new(registry)
            .with_subscriber_configs(blueprint.subscribers.iter().cloned())
            .build()?;

        info!(
            sheets = store.sheet_names().len(),
            subscribers = dispatcher.subscriber_count(),
            "Pipeline ready"
        );

        Ok(Self::new(Arc::new(store), Arc::new(dispatcher)))
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Normalize one payload and dispatch it
    #[instrument(name = "pipeline_process", skip_all)]
    pub async fn process(&self, payload: &str) -> Result<Processed> {
        let started = Instant::now();

        let event = EventNormalizer::normalize_json(payload, self.store.as_ref())?;
        let kind = event.kind();
        observability::record_event_received(kind);

        let outcome = self
            .dispatcher
            .dispatch(&event, self.store.as_ref())
            .await
            .map_err(|source| CliError::Dispatch { kind, source })?;

        observability::record_outcome(kind, outcome.message().is_some());
        if let Some(report) = outcome.report() {
            for name in &report.delivered {
                observability::record_delivery(name, true);
            }
            for failure in &report.failures {
                observability::record_delivery(failure.subscriber(), false);
            }
        }

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        observability::record_dispatch_latency_ms(latency_ms);

        Ok(Processed {
            kind,
            outcome,
            latency_ms,
        })
    }

    /// Process newline-delimited payloads until input ends or `shutdown` fires.
    ///
    /// Each payload runs in its own task; at most `max_in_flight` run at once.
    /// In-flight tasks are awaited before returning.
    #[instrument(name = "pipeline_run", skip(self, reader, shutdown))]
    pub async fn run<R, F>(&self, reader: R, max_in_flight: usize, shutdown: F) -> Result<RunStats>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let max_in_flight = max_in_flight.max(1);
        let mut stats = RunStats::default();
        let mut tasks: JoinSet<Result<Processed>> = JoinSet::new();
        let mut lines = reader.lines();

        tokio::pin!(shutdown);

        loop {
            while tasks.len() >= max_in_flight {
                if let Some(joined) = tasks.join_next().await {
                    stats.record_joined(joined);
                }
            }

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping intake");
                    stats.interrupted = true;
                    break;
                }
            };

            let Some(line) = line else {
                debug!("Input exhausted");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            stats.lines_read += 1;
            let pipeline = self.clone();
            tasks.spawn(async move { pipeline.process(&line).await });
        }

        while let Some(joined) = tasks.join_next().await {
            stats.record_joined(joined);
        }

        stats.duration = started.elapsed();
        info!(
            events = stats.dispatch.total_events,
            messages = stats.dispatch.messages,
            failed = stats.dispatch.failed_invocations,
            "Run finished"
        );
        Ok(stats)
    }
}

fn load_store(path: &Path) -> Result<WorkbookStore> {
    WorkbookStore::load_from_path(path).map_err(|source| CliError::Store {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::{DeliveryError, Message, Subscriber};
    use parking_lot::Mutex;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"
[store]
path = "workbook.json"

[rules.new_submission]
sheet = "Config"
interest_label_cell = "B1"
category_label_cell = "B2"

[rules.status_edit]
sheet = "Config"
target_column_cell = "B3"
label_column_cell = "B4"

[[subscribers]]
name = "audit"
subscriber_type = "log"
"#;

    const WORKBOOK: &str = r#"{
  "sheets": {
    "Config": [["Interest", "Error Type"], ["Category", "Department"], ["Target", 3], ["Label", 1]],
    "Tickets": [["Ticket", "Opened", "Status"], ["Ticket#42", "open", "resolved"]]
  }
}"#;

    #[derive(Default)]
    struct Recording {
        received: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Subscriber for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, message: &Message) -> std::result::Result<(), DeliveryError> {
            self.received.lock().push(message.to_string());
            Ok(())
        }
    }

    fn pipeline_with(recording: Arc<Recording>) -> Pipeline {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("workbook.json"), WORKBOOK).unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, CONFIG).unwrap();

        let blueprint = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        let pipeline = Pipeline::from_blueprint(&blueprint).unwrap();
        pipeline.dispatcher().subscribe(recording);
        pipeline
    }

    const FORM: &str = r#"{"kind":"form_submit","response":{"item_responses":[{"title":"Error Type","response":"Network down"},{"title":"Department","response":"IT"}]}}"#;
    const EDIT: &str = r#"{"kind":"edit","sheet":"Tickets","range":{"row":2,"column":3}}"#;
    const OTHER_EDIT: &str = r#"{"kind":"edit","sheet":"Tickets","range":{"row":2,"column":2}}"#;

    #[tokio::test]
    async fn test_process_form_submission() {
        let recording = Arc::new(Recording::default());
        let pipeline = pipeline_with(recording.clone());

        let processed = pipeline.process(FORM).await.unwrap();

        assert_eq!(processed.kind, EventKind::Created);
        assert_eq!(
            recording.received.lock().as_slice(),
            &["New report: Network down (Category: IT)".to_string()]
        );
        let report = processed.outcome.report().unwrap();
        assert_eq!(report.delivered, vec!["audit", "recording"]);
    }

    #[tokio::test]
    async fn test_process_rejects_unknown_kind() {
        let pipeline = pipeline_with(Arc::new(Recording::default()));
        let err = pipeline.process(r#"{"kind":"open"}"#).await.unwrap_err();
        assert!(matches!(err, CliError::Ingestion(_)));
        assert_eq!(err.stage(), "ingestion");
    }

    #[tokio::test]
    async fn test_run_processes_every_line() {
        let recording = Arc::new(Recording::default());
        let pipeline = pipeline_with(recording.clone());

        let mut input = NamedTempFile::new().unwrap();
        writeln!(input, "{FORM}\n\n{EDIT}\n{OTHER_EDIT}\nnot json").unwrap();
        let file = tokio::fs::File::open(input.path()).await.unwrap();
        let reader = tokio::io::BufReader::new(file);

        let stats = pipeline
            .run(reader, 2, std::future::pending::<()>())
            .await
            .unwrap();

        assert_eq!(stats.lines_read, 4);
        assert_eq!(stats.dispatch.total_events, 4);
        assert_eq!(stats.dispatch.messages, 2);
        assert_eq!(stats.dispatch.silent, 1);
        assert_eq!(stats.dispatch.failed_invocations, 1);
        assert!(!stats.interrupted);

        let mut received = recording.received.lock().clone();
        received.sort();
        assert_eq!(
            received,
            vec![
                "New report: Network down (Category: IT)".to_string(),
                "Status changed: Ticket#42 to resolved".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let pipeline = pipeline_with(Arc::new(Recording::default()));
        let reader = tokio::io::BufReader::new(tokio::io::empty());

        let stats = pipeline.run(reader, 4, async {}).await.unwrap();

        // Either branch may win on an empty input, nothing is processed
        assert_eq!(stats.lines_read, 0);
    }
}
