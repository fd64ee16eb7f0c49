//! MailerSend Dispatch - transactional email through MailerSend
//!
//! This crate validates normalized send-requests, resolves and size-checks
//! attachments, composes the provider payload and classifies the provider's
//! answer into a uniform outcome.

pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod file_provider;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use service::MailDispatchService;
