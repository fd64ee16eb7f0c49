//! Composed outbound message, serialized as the MailerSend `/v1/email` payload

use crate::domain::{Disposition, MailHeader, Recipient, ResolvedAttachment};
use serde::Serialize;
use serde_json::{Map, Value};

/// Message sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Sender {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            email: email.into(),
            name: if name.trim().is_empty() { None } else { Some(name) },
        }
    }
}

/// Template data for one recipient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Personalization {
    pub email: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundAttachment {
    pub content: String,
    pub filename: String,
    pub disposition: Disposition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<&ResolvedAttachment> for OutboundAttachment {
    fn from(attachment: &ResolvedAttachment) -> Self {
        Self {
            content: attachment.content.clone(),
            filename: attachment.filename().to_string(),
            disposition: attachment.disposition,
            id: attachment.content_id.clone(),
        }
    }
}

/// Fully assembled message.
///
/// Exactly one of `html` and `template_id` is set by the composer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub from: Sender,
    pub to: Vec<Recipient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Recipient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Recipient>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub personalization: Vec<Personalization>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<OutboundAttachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<MailHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl OutboundMessage {
    /// Empty message with only sender and subject set
    pub fn new(from: Sender, subject: impl Into<String>) -> Self {
        Self {
            from,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: subject.into(),
            html: None,
            template_id: None,
            personalization: Vec::new(),
            attachments: Vec::new(),
            headers: Vec::new(),
            in_reply_to: None,
            references: Vec::new(),
        }
    }

    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}
