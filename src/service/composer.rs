//! Outbound message composition

use crate::domain::{MailHeader, ResolvedAttachment, SendRequest};
use crate::email::{OutboundAttachment, OutboundMessage, Personalization, Sender};
use crate::error::{AppError, Result};
use crate::service::recipients::RecipientLists;

/// A request must carry a body or a template
pub fn ensure_content(request: &SendRequest) -> Result<()> {
    if request.uses_template() || request.body.is_some() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Either a body or a template is required".to_string(),
        ))
    }
}

/// Assemble the outbound message.
///
/// In template mode one personalization record is produced per `to`
/// recipient and no HTML body is set, even when the request carries one.
pub fn compose(
    request: &SendRequest,
    recipients: RecipientLists,
    attachments: &[ResolvedAttachment],
) -> Result<OutboundMessage> {
    ensure_content(request)?;

    let mut message = OutboundMessage::new(
        Sender::new(&request.received_from, &request.received_from_name),
        &request.subject,
    );

    message.to = recipients.to;
    message.cc = recipients.cc;
    message.bcc = recipients.bcc;
    message.attachments = attachments.iter().map(OutboundAttachment::from).collect();
    message.headers = request
        .headers
        .iter()
        .map(validate_header)
        .collect::<Result<_>>()?;

    if let Some(in_reply_to) = request
        .in_reply_to
        .as_deref()
        .filter(|id| !id.trim().is_empty())
    {
        message.in_reply_to = Some(validate_message_id("in_reply_to", in_reply_to)?);
    }
    message.references = request
        .reply_references
        .iter()
        .map(|id| validate_message_id("reply_references", id))
        .collect::<Result<_>>()?;

    match request.template() {
        Some(template_id) => {
            let data = request.personalization.clone().unwrap_or_default();
            message.template_id = Some(template_id.to_string());
            message.personalization = message
                .to
                .iter()
                .map(|recipient| Personalization {
                    email: recipient.email.clone(),
                    data: data.clone(),
                })
                .collect();
        }
        None => {
            message.html = request.body.clone();
        }
    }

    Ok(message)
}

fn validate_header(header: &MailHeader) -> Result<MailHeader> {
    let name = header.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Header name must not be empty".to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_graphic() && c != ':') {
        return Err(AppError::Validation(format!("Invalid header name: {}", name)));
    }
    if header.value.contains(['\r', '\n']) {
        return Err(AppError::Validation(format!(
            "Header {} must not contain line breaks",
            name
        )));
    }
    Ok(MailHeader::new(name, header.value.trim()))
}

fn validate_message_id(field: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() || id.contains(['\r', '\n']) {
        return Err(AppError::Validation(format!(
            "Invalid message identifier in '{}'",
            field
        )));
    }
    Ok(id.to_string())
}
