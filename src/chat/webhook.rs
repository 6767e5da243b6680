//! Outbound webhook client.
//!
//! DESIGN
//! ======
//! One `POST` per user message to a fixed endpoint. The JSON body carries the
//! message, the call time, the client agent string, and the session id. A
//! reply is usable only when the response is 2xx JSON with a non-empty
//! `reply` string; everything else maps to a [`ChatError`].
//!
//! ERROR HANDLING
//! ==============
//! No retries. Callers turn any error into a fallback bot message.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::types::ChatError;
use crate::config::WidgetConfig;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Body of the outbound webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookRequest {
    pub message: String,
    /// RFC 3339 timestamp taken when the request is built.
    pub timestamp: String,
    pub user_agent: String,
    pub session_id: String,
}

impl WebhookRequest {
    #[must_use]
    pub fn new(message: impl Into<String>, user_agent: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: now_rfc3339(),
            user_agent: user_agent.into(),
            session_id: session_id.into(),
        }
    }
}

fn now_rfc3339() -> String {
    // Formatting only fails for years outside 0..=9999.
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// Extract the bot reply from a response body.
pub fn parse_reply(body: &str) -> Result<String, ChatError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ChatError::Parse(e.to_string()))?;
    match value.get("reply") {
        Some(Value::String(reply)) if !reply.is_empty() => Ok(reply.clone()),
        _ => Err(ChatError::MissingReply),
    }
}

// =============================================================================
// CLIENT TRAIT
// =============================================================================

/// Sends one chat message and returns the bot reply. Enables mocking in tests.
#[async_trait::async_trait]
pub trait WebhookClient: Send + Sync {
    async fn send(&self, request: &WebhookRequest) -> Result<String, ChatError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpWebhook {
    http: reqwest::Client,
    url: String,
}

impl HttpWebhook {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ChatError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: url.into() })
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self, ChatError> {
        Self::new(config.webhook_url.clone(), config.request_timeout)
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl WebhookClient for HttpWebhook {
    async fn send(&self, request: &WebhookRequest) -> Result<String, ChatError> {
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ChatError::Status { status: status.as_u16(), body: text });
        }
        parse_reply(&text)
    }
}

#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;
