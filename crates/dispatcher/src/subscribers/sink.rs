//! SinkSubscriber - one destination on a notification sink

use async_trait::async_trait;
use contracts::{DeliveryError, Message, NotificationSink, Subscriber};
use tracing::{debug, instrument};

/// Delivers to a single destination (group or user) through a sink.
///
/// Any non-2xx response is a rejection.
pub struct SinkSubscriber<S> {
    name: String,
    destination: String,
    sink: S,
}

impl<S: NotificationSink> SinkSubscriber<S> {
    pub fn new(name: impl Into<String>, destination: impl Into<String>, sink: S) -> Self {
        Self {
            name: name.into(),
            destination: destination.into(),
            sink,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

#[async_trait]
impl<S: NotificationSink + Sync> Subscriber for SinkSubscriber<S> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "sink_subscriber_deliver",
        skip(self, message),
        fields(subscriber = %self.name, sink = %self.sink.name())
    )]
    async fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        let response = self
            .sink
            .send(&self.destination, message.as_str())
            .await
            .map_err(|e| DeliveryError::transport(&self.name, e.message))?;

        if !response.is_success() {
            return Err(DeliveryError::rejected(
                &self.name,
                response.status_code,
                response.body,
            ));
        }

        debug!(status = response.status_code, "Delivered");
        Ok(())
    }
}
