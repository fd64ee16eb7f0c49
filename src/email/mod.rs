//! Email delivery through the provider
//!
//! - `message`: the composed outbound message (MailerSend wire shape)
//! - `provider`: the provider trait and its response types
//! - `mailersend`: the MailerSend HTTP implementation

pub mod mailersend;
pub mod message;
pub mod provider;

pub use mailersend::MailerSendProvider;
pub use message::{OutboundAttachment, OutboundMessage, Personalization, Sender};
pub use provider::{
    EmailProvider, EmailProviderError, ProviderResponse, ProviderWarning, WarningRecipient,
};
