//! # Dispatcher
//!
//! Notification fan-out.
//!
//! Responsible for:
//! - Running the interpretation strategy for a change event
//! - Broadcasting the resulting message to every subscriber
//! - Isolating failing subscribers, never aborting the broadcast

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;
pub mod subscribers;

pub use contracts::{Message, Subscriber};
pub use dispatcher::{
    create_subscriber, BroadcastReport, DispatchOutcome, Dispatcher, DispatcherBuilder,
    FailureSummary, OutcomeSummary,
};
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, SubscriberMetrics};
pub use sinks::LinePushSink;
pub use subscribers::{LogSubscriber, SinkSubscriber};
