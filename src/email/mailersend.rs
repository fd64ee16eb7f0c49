//! MailerSend HTTP API provider
//!
//! Sends via `POST /v1/email` with a bearer API key. Any HTTP answer is
//! returned as a [`ProviderResponse`] so the caller can classify it; only
//! transport failures become errors.

use super::message::OutboundMessage;
use super::provider::{EmailProvider, EmailProviderError, ProviderResponse, ProviderWarning};
use crate::config::MailerSendConfig;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

const MESSAGE_ID_HEADER: &str = "x-message-id";

/// MailerSend email provider
pub struct MailerSendProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl MailerSendProvider {
    /// Create a new provider from configuration
    pub fn from_config(config: &MailerSendConfig) -> Result<Self, EmailProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(EmailProviderError::NotConfigured);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EmailProviderError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn email_url(&self) -> String {
        format!("{}/v1/email", self.base_url)
    }
}

#[async_trait]
impl EmailProvider for MailerSendProvider {
    async fn send(
        &self,
        message: &OutboundMessage,
    ) -> Result<ProviderResponse, EmailProviderError> {
        debug!(
            "MailerSend: sending to {} recipient(s), {} attachment(s)",
            message.recipient_count(),
            message.attachments.len()
        );

        let response = self
            .client
            .post(self.email_url())
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status_code = response.status().as_u16();
        let message_id = response
            .headers()
            .get(MESSAGE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| EmailProviderError::ConnectionError(e.to_string()))?;

        info!("MailerSend responded with status {}", status_code);

        let mut result = parse_response(status_code, &body);
        result.message_id = message_id;
        Ok(result)
    }

    fn provider_name(&self) -> &'static str {
        "mailersend"
    }
}

fn classify_transport_error(e: reqwest::Error) -> EmailProviderError {
    if e.is_timeout() {
        EmailProviderError::Timeout(e.to_string())
    } else if e.is_connect() {
        EmailProviderError::ConnectionError(e.to_string())
    } else {
        EmailProviderError::SendFailed(e.to_string())
    }
}

fn parse_response(status_code: u16, body: &str) -> ProviderResponse {
    let response = ProviderResponse::new(status_code);
    if body.trim().is_empty() {
        return response;
    }

    let parsed = serde_json::from_str::<Value>(body).ok();

    if !(200..300).contains(&status_code) {
        let detail = parsed
            .as_ref()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        return response.with_detail(detail);
    }

    match parsed.as_ref().and_then(|value| value.get("warnings")) {
        Some(warnings) => response.with_warnings(read_warnings(warnings)),
        None => response,
    }
}

/// Every entry of a `warnings` array is a warning, whatever its shape.
/// A non-array value counts as a single warning unless it is empty or falsy.
fn read_warnings(value: &Value) -> Vec<ProviderWarning> {
    match value {
        Value::Array(entries) => entries.iter().map(ProviderWarning::from_value).collect(),
        Value::Null | Value::Bool(false) => Vec::new(),
        Value::String(text) if text.is_empty() => Vec::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => Vec::new(),
        other => {
            warn!("MailerSend returned warnings in an unexpected shape");
            vec![ProviderWarning::from_value(other)]
        }
    }
}
