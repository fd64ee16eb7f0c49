//! Configuration management for the dispatch service

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// MailerSend API configuration
    pub mailersend: MailerSendConfig,
    /// Size limits enforced before anything is sent
    pub limits: LimitsConfig,
    /// Attachment resolution configuration
    pub attachments: AttachmentConfig,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct MailerSendConfig {
    pub api_key: String,
    /// API root, without the `/v1` suffix (e.g. https://api.mailersend.com)
    pub base_url: String,
    pub timeout_secs: u64,
}

impl MailerSendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Size limits, stored in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitsConfig {
    pub max_body_size_bytes: u64,
    pub max_attachment_size_bytes: u64,
}

impl LimitsConfig {
    /// `None` when either limit does not fit in bytes
    pub fn from_megabytes(body_mb: u64, attachment_mb: u64) -> Option<Self> {
        Some(Self {
            max_body_size_bytes: body_mb.checked_mul(BYTES_PER_MB)?,
            max_attachment_size_bytes: attachment_mb.checked_mul(BYTES_PER_MB)?,
        })
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size_bytes: 10 * BYTES_PER_MB,
            max_attachment_size_bytes: 25 * BYTES_PER_MB,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentConfig {
    /// How many attachments may be fetched at once (1 = strictly sequential)
    pub resolve_concurrency: usize,
    /// Base directory for the local file provider
    pub base_dir: PathBuf,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            resolve_concurrency: 1,
            base_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "pretty" or "json"
    pub log_format: String,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            service_name: "mailersend-dispatch".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("MAILERSEND_BASE_URL")
            .unwrap_or_else(|_| "https://api.mailersend.com".to_string());
        url::Url::parse(&base_url).context("Invalid MAILERSEND_BASE_URL")?;

        let resolve_concurrency: usize = env::var("MAIL_RESOLVE_CONCURRENCY")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .context("Invalid MAIL_RESOLVE_CONCURRENCY")?;

        Ok(Self {
            mailersend: MailerSendConfig {
                api_key: env::var("MAILERSEND_API_KEY")
                    .context("MAILERSEND_API_KEY is required")?,
                base_url: base_url.trim_end_matches('/').to_string(),
                timeout_secs: env::var("MAILERSEND_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid MAILERSEND_TIMEOUT_SECS")?,
            },
            limits: LimitsConfig::from_megabytes(
                env::var("MAIL_MAX_BODY_SIZE_MB")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("Invalid MAIL_MAX_BODY_SIZE_MB")?,
                env::var("MAIL_MAX_ATTACHMENT_SIZE_MB")
                    .unwrap_or_else(|_| "25".to_string())
                    .parse()
                    .context("Invalid MAIL_MAX_ATTACHMENT_SIZE_MB")?,
            )
            .context("MAIL_MAX_BODY_SIZE_MB or MAIL_MAX_ATTACHMENT_SIZE_MB is too large")?,
            attachments: AttachmentConfig {
                resolve_concurrency: resolve_concurrency.max(1),
                base_dir: env::var("MAIL_ATTACHMENT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".")),
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "mailersend-dispatch".to_string()),
            },
        })
    }
}
