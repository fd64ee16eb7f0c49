//! Email provider trait and error types

use super::message::OutboundMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Email provider error types.
///
/// These are transport-level failures only; an HTTP response with any status
/// code is reported as a [`ProviderResponse`].
#[derive(Error, Debug)]
pub enum EmailProviderError {
    #[error("Email provider not configured")]
    NotConfigured,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Recipient named in a provider warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningRecipient {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Non-fatal issue reported alongside an accepted send.
///
/// Deserialization never fails: any JSON value becomes a warning, so an
/// entry in an unexpected shape still counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ProviderWarning {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<WarningRecipient>,
}

impl ProviderWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            recipients: Vec::new(),
        }
    }

    /// Read a warning entry, falling back to the raw JSON as its text
    pub fn from_value(value: &Value) -> Self {
        let message = text_field(value, "warning")
            .or_else(|| text_field(value, "message"))
            .map(str::to_string)
            .unwrap_or_else(|| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            });

        let recipients = value
            .get("recipients")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| WarningRecipient::deserialize(entry).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            kind: text_field(value, "type").map(str::to_string),
            message,
            recipients,
        }
    }
}

impl From<Value> for ProviderWarning {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn text_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// What the provider answered, whatever the status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status_code: u16,
    pub message_id: Option<String>,
    pub warnings: Vec<ProviderWarning>,
    /// Error body for non-success statuses, for logs only
    pub detail: Option<String>,
}

impl ProviderResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            message_id: None,
            warnings: Vec::new(),
            detail: None,
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<ProviderWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 200 and 202 are the only statuses that mean "accepted"
    pub fn is_accepted(&self) -> bool {
        matches!(self.status_code, 200 | 202)
    }
}

/// Trait for email providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Hand a composed message to the provider
    async fn send(&self, message: &OutboundMessage)
        -> Result<ProviderResponse, EmailProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
