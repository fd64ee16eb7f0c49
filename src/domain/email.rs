//! Send-request domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Normalized request to send one transactional email.
///
/// `to`, `cc` and `bcc` carry the JSON text of a `[{"email": ...}]` list, the
/// way host applications forward them from form fields. They are decoded by
/// [`crate::service::recipients::decode_recipients`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SendRequest {
    #[serde(default)]
    pub to: Option<String>,

    #[serde(default)]
    pub cc: Option<String>,

    #[serde(default)]
    pub bcc: Option<String>,

    /// Sender address
    #[validate(email)]
    #[serde(alias = "receivedFrom")]
    pub received_from: String,

    #[serde(default, alias = "receivedFromName")]
    pub received_from_name: String,

    #[serde(default)]
    pub subject: String,

    /// Raw HTML body, ignored when a template is used
    #[serde(default)]
    pub body: Option<String>,

    /// Provider-side template identifier
    #[serde(default, alias = "templateId")]
    pub template_id: Option<String>,

    /// Data merged into the template for every `to` recipient
    #[serde(default)]
    pub personalization: Option<Map<String, Value>>,

    #[serde(default, alias = "inReplyTo")]
    pub in_reply_to: Option<String>,

    /// Prior message identifiers, oldest first
    #[serde(default, alias = "replyReferences")]
    pub reply_references: Vec<String>,

    #[serde(default)]
    pub headers: Vec<MailHeader>,

    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

impl SendRequest {
    /// Template identifier, treating a blank value as absent
    pub fn template(&self) -> Option<&str> {
        self.template_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Whether this request is sent in template mode
    pub fn uses_template(&self) -> bool {
        self.template().is_some()
    }
}

/// Reference to a file held by the external file store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    #[serde(alias = "fileId")]
    pub file_id: i64,

    /// Inline (embedded in the body) rather than a regular attachment
    #[serde(default)]
    pub embedded: bool,

    /// Display name override
    #[serde(default, alias = "fileName")]
    pub file_name: Option<String>,

    /// Storage locator understood by the file provider
    #[serde(default)]
    pub path: Option<String>,
}

impl AttachmentRef {
    pub fn new(file_id: i64) -> Self {
        Self {
            file_id,
            ..Default::default()
        }
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Free-form header forwarded to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailHeader {
    pub name: String,
    pub value: String,
}

impl MailHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Email address with optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}
