//! Dispatch pipeline

pub mod attachments;
pub mod composer;
pub mod dispatch;
pub mod interpreter;
pub mod recipients;
pub mod size;
pub mod status;

pub use attachments::AttachmentResolver;
pub use dispatch::MailDispatchService;
pub use recipients::{decode_recipients, RecipientLists};
pub use status::{ResponseMessages, ResponseSummary, StatusSink};
