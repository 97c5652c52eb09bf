//! LogSubscriber - logs each message via tracing

use async_trait::async_trait;
use contracts::{DeliveryError, Message, Subscriber};
use tracing::info;

/// Subscriber that logs messages, for dry runs and auditing
pub struct LogSubscriber {
    name: String,
}

impl LogSubscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Subscriber for LogSubscriber {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        info!(subscriber = %self.name, message = %message, "Notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_subscriber_deliver() {
        let subscriber = LogSubscriber::new("audit");
        let message = Message::new("hello").unwrap();

        assert!(subscriber.deliver(&message).await.is_ok());
        assert_eq!(subscriber.name(), "audit");
    }
}
