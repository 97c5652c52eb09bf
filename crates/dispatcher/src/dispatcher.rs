//! Dispatcher - interprets an event and fans the message out to subscribers

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use contracts::{
    ChangeEvent, DeliveryError, InterpretationStrategy, Message, StrategyRegistry, Subscriber,
    SubscriberConfig, SubscriberType, TabularStore,
};

use crate::error::DispatcherError;
use crate::metrics::{MetricsSnapshot, SubscriberMetrics};
use crate::sinks::LinePushSink;
use crate::subscribers::{LogSubscriber, SinkSubscriber};

/// Result of one broadcast
#[derive(Debug, Default)]
pub struct BroadcastReport {
    /// Subscribers that received the message, in delivery order
    pub delivered: Vec<String>,
    /// One entry per subscriber that missed it
    pub failures: Vec<DeliveryError>,
}

impl BroadcastReport {
    /// Number of subscribers attempted
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failures.len()
    }

    /// True when no subscriber failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of one trigger invocation
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The strategy produced no message
    Silent,
    /// A message was produced and broadcast
    Broadcast {
        message: Message,
        report: BroadcastReport,
    },
}

impl DispatchOutcome {
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Silent => None,
            Self::Broadcast { message, .. } => Some(message),
        }
    }

    pub fn report(&self) -> Option<&BroadcastReport> {
        match self {
            Self::Silent => None,
            Self::Broadcast { report, .. } => Some(report),
        }
    }
}

/// Flat view of an outcome for JSON output
#[derive(Debug, Serialize)]
pub struct OutcomeSummary {
    pub message: Option<String>,
    pub delivered: Vec<String>,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub subscriber: String,
    pub error: String,
}

impl From<&DispatchOutcome> for OutcomeSummary {
    fn from(outcome: &DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Silent => Self {
                message: None,
                delivered: Vec::new(),
                failures: Vec::new(),
            },
            DispatchOutcome::Broadcast { message, report } => Self {
                message: Some(message.to_string()),
                delivered: report.delivered.clone(),
                failures: report
                    .failures
                    .iter()
                    .map(|e| FailureSummary {
                        subscriber: e.subscriber().to_string(),
                        error: e.to_string(),
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Clone)]
struct SubscriberEntry {
    subscriber: Arc<dyn Subscriber>,
    metrics: Arc<SubscriberMetrics>,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    registry: StrategyRegistry,
    configs: Vec<SubscriberConfig>,
    subscribers: Vec<Arc<dyn Subscriber>>,
}

impl DispatcherBuilder {
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry,
            configs: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Subscribers to create from configuration, in order
    pub fn with_subscriber_configs(
        mut self,
        configs: impl IntoIterator<Item = SubscriberConfig>,
    ) -> Self {
        self.configs.extend(configs);
        self
    }

    /// Add an already constructed subscriber (after the configured ones)
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Build the dispatcher
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(subscriber_count = self.configs.len() + self.subscribers.len())
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let dispatcher = Dispatcher::new(self.registry);

        for config in &self.configs {
            dispatcher.subscribe(create_subscriber(config)?);
        }
        for subscriber in self.subscribers {
            dispatcher.subscribe(subscriber);
        }

        info!(
            subscribers = dispatcher.subscriber_count(),
            "Dispatcher built"
        );
        Ok(dispatcher)
    }
}

/// Create a subscriber from configuration
#[instrument(
    name = "dispatcher_create_subscriber",
    skip(config),
    fields(subscriber = %config.name, subscriber_type = ?config.subscriber_type)
)]
pub fn create_subscriber(
    config: &SubscriberConfig,
) -> Result<Arc<dyn Subscriber>, DispatcherError> {
    match config.subscriber_type {
        SubscriberType::Log => Ok(Arc::new(LogSubscriber::new(&config.name))),
        SubscriberType::Line => {
            let destination = config.params.get("destination").ok_or_else(|| {
                DispatcherError::subscriber_creation(
                    &config.name,
                    "missing 'destination' parameter",
                )
            })?;
            let sink = LinePushSink::from_params(&config.name, &config.params)?;
            Ok(Arc::new(SinkSubscriber::new(&config.name, destination, sink)))
        }
    }
}

/// Routes change events through a strategy and broadcasts the result.
///
/// Shared by `Arc` across concurrent invocations. Locks are released before
/// any delivery is awaited.
pub struct Dispatcher {
    registry: StrategyRegistry,
    strategy: RwLock<Option<Arc<dyn InterpretationStrategy>>>,
    subscribers: RwLock<Vec<SubscriberEntry>>,
}

impl Dispatcher {
    /// Create a dispatcher with no subscribers and no active strategy
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry,
            strategy: RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Add a subscriber. Returns false if this exact subscriber is already present.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> bool {
        let mut subscribers = self.subscribers.write();
        if subscribers
            .iter()
            .any(|entry| Arc::ptr_eq(&entry.subscriber, &subscriber))
        {
            debug!(subscriber = %subscriber.name(), "Already subscribed");
            return false;
        }

        debug!(subscriber = %subscriber.name(), "Subscribed");
        subscribers.push(SubscriberEntry {
            subscriber,
            metrics: Arc::new(SubscriberMetrics::new()),
        });
        true
    }

    /// Remove a subscriber. Returns false if it was not present.
    pub fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|entry| !Arc::ptr_eq(&entry.subscriber, subscriber));
        let removed = subscribers.len() != before;
        if removed {
            debug!(subscriber = %subscriber.name(), "Unsubscribed");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Subscriber names in delivery order
    pub fn subscriber_names(&self) -> Vec<String> {
        self.subscribers
            .read()
            .iter()
            .map(|entry| entry.subscriber.name().to_string())
            .collect()
    }

    /// Get metrics for all subscribers
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.subscribers
            .read()
            .iter()
            .map(|entry| {
                (
                    entry.subscriber.name().to_string(),
                    entry.metrics.snapshot(),
                )
            })
            .collect()
    }

    /// Replace the active strategy used by [`Dispatcher::handle`]
    pub fn set_strategy(&self, strategy: Arc<dyn InterpretationStrategy>) {
        debug!(strategy = %strategy.name(), "Active strategy set");
        *self.strategy.write() = Some(strategy);
    }

    /// Handle an event with the active strategy
    ///
    /// # Errors
    /// `NoStrategy` if `set_strategy` was never called. Prefer
    /// [`Dispatcher::dispatch`] when invocations run concurrently.
    pub async fn handle(
        &self,
        event: &ChangeEvent,
        store: &dyn TabularStore,
    ) -> Result<DispatchOutcome, DispatcherError> {
        let strategy = self
            .strategy
            .read()
            .clone()
            .ok_or(DispatcherError::NoStrategy)?;
        self.handle_with(event, strategy.as_ref(), store).await
    }

    /// Handle an event with the strategy registered for its kind
    pub async fn dispatch(
        &self,
        event: &ChangeEvent,
        store: &dyn TabularStore,
    ) -> Result<DispatchOutcome, DispatcherError> {
        let strategy = Arc::clone(self.registry.for_event(event));
        self.handle_with(event, strategy.as_ref(), store).await
    }

    /// Interpret with the given strategy, then broadcast any message
    #[instrument(
        name = "dispatcher_handle",
        skip(self, event, strategy, store),
        fields(event_kind = %event.kind(), strategy = %strategy.name())
    )]
    pub async fn handle_with(
        &self,
        event: &ChangeEvent,
        strategy: &dyn InterpretationStrategy,
        store: &dyn TabularStore,
    ) -> Result<DispatchOutcome, DispatcherError> {
        let Some(message) = strategy.interpret(event, store)? else {
            debug!("No message produced");
            return Ok(DispatchOutcome::Silent);
        };

        let report = self.broadcast(&message).await;
        Ok(DispatchOutcome::Broadcast { message, report })
    }

    /// Deliver to every current subscriber in insertion order.
    ///
    /// A failing subscriber never stops the remaining ones.
    #[instrument(name = "dispatcher_broadcast", skip(self, message))]
    pub async fn broadcast(&self, message: &Message) -> BroadcastReport {
        let snapshot: Vec<SubscriberEntry> = self.subscribers.read().clone();
        let mut report = BroadcastReport::default();

        for entry in &snapshot {
            let name = entry.subscriber.name();
            match entry.subscriber.deliver(message).await {
                Ok(()) => {
                    entry.metrics.inc_delivered_count();
                    report.delivered.push(name.to_string());
                }
                Err(e) => {
                    entry.metrics.inc_failure_count();
                    warn!(subscriber = %name, error = %e, "Delivery failed");
                    report.failures.push(e);
                }
            }
        }

        info!(
            delivered = report.delivered.len(),
            failed = report.failures.len(),
            "Broadcast complete"
        );
        report
    }
}
