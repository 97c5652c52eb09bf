//! NotificationSink trait - push-notification delivery channel
//!
//! Opaque transport: accepts text for a destination and reports the response.

use thiserror::Error;

/// Response returned by the delivery channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    pub status_code: u16,
    pub body: String,
}

impl SinkResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// The request never produced a response
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Delivery channel trait
///
/// All channel adapters must implement this trait.
#[trait_variant::make(NotificationSink: Send)]
pub trait LocalNotificationSink {
    /// Channel name (used for logging)
    fn name(&self) -> &str;

    /// Send plain text to a destination
    ///
    /// # Errors
    /// Returns `TransportError` when no response was received
    async fn send(&self, destination: &str, text: &str) -> Result<SinkResponse, TransportError>;
}
