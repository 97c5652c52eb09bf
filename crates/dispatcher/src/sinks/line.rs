//! LinePushSink - LINE Messaging API push over HTTPS

use std::collections::HashMap;
use std::time::Duration;

use contracts::{NotificationSink, SinkResponse, TransportError};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::DispatcherError;

/// LINE push endpoint
pub const LINE_PUSH_ENDPOINT: &str = "https://api.line.me/v2/bot/message/push";

/// Environment variable holding the channel access token when `token_env` is not set
pub const DEFAULT_TOKEN_ENV: &str = "LINE_CHANNEL_ACCESS_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

impl<'a> PushRequest<'a> {
    fn text(to: &'a str, text: &'a str) -> Self {
        Self {
            to,
            messages: [TextMessage {
                message_type: "text",
                text,
            }],
        }
    }
}

/// Sink that pushes a text message to a LINE group or user
pub struct LinePushSink {
    name: String,
    client: Client,
    endpoint: String,
    token: String,
}

impl LinePushSink {
    /// Create a sink against the public LINE endpoint
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_endpoint(
            name,
            token,
            LINE_PUSH_ENDPOINT,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a sink against an arbitrary endpoint
    pub fn with_endpoint(
        name: impl Into<String>,
        token: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name: name.into(),
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    /// Create from subscriber params (for the builder)
    ///
    /// Recognised params: `token_env`, `endpoint`, `timeout_secs`.
    /// The token itself is never read from the params map.
    pub fn from_params(
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<Self, DispatcherError> {
        let token_env = params
            .get("token_env")
            .map(String::as_str)
            .unwrap_or(DEFAULT_TOKEN_ENV);
        let token = std::env::var(token_env).map_err(|_| {
            DispatcherError::subscriber_creation(
                name,
                format!("environment variable '{token_env}' is not set"),
            )
        })?;

        let endpoint = params
            .get("endpoint")
            .map(String::as_str)
            .unwrap_or(LINE_PUSH_ENDPOINT);

        let timeout_secs = match params.get("timeout_secs") {
            Some(raw) => raw.parse().map_err(|_| {
                DispatcherError::subscriber_creation(name, format!("invalid timeout_secs '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        debug!(sink = %name, endpoint, timeout_secs, "LinePushSink configured");

        Self::with_endpoint(name, token, endpoint, Duration::from_secs(timeout_secs))
            .map_err(|e| DispatcherError::subscriber_creation(name, e.to_string()))
    }
}

impl NotificationSink for LinePushSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "line_push_send",
        skip(self, text),
        fields(sink = %self.name)
    )]
    async fn send(&self, destination: &str, text: &str) -> Result<SinkResponse, TransportError> {
        let request = PushRequest::text(destination, text);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        info!(status = status_code, body = %body, "LINE push response");

        Ok(SinkResponse { status_code, body })
    }
}
