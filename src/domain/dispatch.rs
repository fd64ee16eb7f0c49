//! Types produced while a send is in flight

use serde::{Deserialize, Serialize};

/// How an attachment is presented by the mail client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        }
    }
}

/// Attachment content fetched from the file store and ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    /// Base64 encoded content
    pub content: String,
    /// Name reported by the file store
    pub original_name: String,
    /// Display name override from the request
    pub file_name: Option<String>,
    pub disposition: Disposition,
    /// Set only for inline attachments
    pub content_id: Option<String>,
}

impl ResolvedAttachment {
    /// Build an inline attachment; its content id is `image_<file_id>`
    pub fn inline(content: String, original_name: String, file_id: i64) -> Self {
        Self {
            content,
            original_name,
            file_name: None,
            disposition: Disposition::Inline,
            content_id: Some(format!("image_{}", file_id)),
        }
    }

    pub fn regular(content: String, original_name: String) -> Self {
        Self {
            content,
            original_name,
            file_name: None,
            disposition: Disposition::Attachment,
            content_id: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name.filter(|name| !name.trim().is_empty());
        self
    }

    /// Filename handed to the provider
    pub fn filename(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.original_name)
    }
}

/// Severity of a user-facing status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

/// Record handed to the status sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    pub severity: Severity,
    pub visible: bool,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            visible: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            visible: true,
        }
    }
}

/// Final, classified result of a send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub delivered: bool,
    /// Provider warnings, in the order reported
    pub warnings: Vec<String>,
    pub user_message: String,
    /// Provider status code, absent on transport failure
    pub status_code: Option<u16>,
    pub message_id: Option<String>,
}

impl DispatchOutcome {
    pub fn delivered(
        user_message: impl Into<String>,
        status_code: u16,
        message_id: Option<String>,
    ) -> Self {
        Self {
            delivered: true,
            warnings: Vec::new(),
            user_message: user_message.into(),
            status_code: Some(status_code),
            message_id,
        }
    }

    pub fn failed(user_message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            delivered: false,
            warnings: Vec::new(),
            user_message: user_message.into(),
            status_code,
            message_id: None,
        }
    }

    /// Whether the provider accepted the message but flagged problems
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
