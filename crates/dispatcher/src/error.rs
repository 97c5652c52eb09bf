//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Per-subscriber failures are not here: they end up in the `BroadcastReport`.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// `handle` called before any strategy was set
    #[error("no interpretation strategy set")]
    NoStrategy,

    /// Subscriber creation error
    #[error("failed to create subscriber '{name}': {message}")]
    SubscriberCreation { name: String, message: String },

    /// Interpretation failed (from contract)
    #[error("interpretation error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a subscriber creation error
    pub fn subscriber_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SubscriberCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
