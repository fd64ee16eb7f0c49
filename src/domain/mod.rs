//! Domain models

pub mod dispatch;
pub mod email;

pub use dispatch::{Disposition, DispatchOutcome, ResolvedAttachment, Severity, StatusMessage};
pub use email::{AttachmentRef, MailHeader, Recipient, SendRequest};
