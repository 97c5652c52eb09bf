//! Subscriber trait - Dispatcher output interface

use async_trait::async_trait;
use thiserror::Error;

use crate::Message;

/// Per-subscriber delivery failure
///
/// Never fatal for the broadcast: the dispatcher records it and moves on.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Channel could not be reached
    #[error("subscriber '{subscriber}' transport failure: {message}")]
    Transport { subscriber: String, message: String },

    /// Channel answered with a non-success status
    #[error("subscriber '{subscriber}' rejected with status {status}: {body}")]
    Rejected {
        subscriber: String,
        status: u16,
        body: String,
    },
}

impl DeliveryError {
    pub fn transport(subscriber: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            subscriber: subscriber.into(),
            message: message.into(),
        }
    }

    pub fn rejected(subscriber: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            subscriber: subscriber.into(),
            status,
            body: body.into(),
        }
    }

    /// Name of the subscriber that failed
    pub fn subscriber(&self) -> &str {
        match self {
            Self::Transport { subscriber, .. } | Self::Rejected { subscriber, .. } => subscriber,
        }
    }
}

/// Receiver of broadcast messages
///
/// Held by the dispatcher as `Arc<dyn Subscriber>`; identity is the `Arc` pointer.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Subscriber name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one message
    ///
    /// # Errors
    /// Returns a `DeliveryError` describing why this subscriber missed the message
    async fn deliver(&self, message: &Message) -> Result<(), DeliveryError>;
}
