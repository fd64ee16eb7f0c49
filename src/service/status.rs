//! User-facing status reporting

use crate::domain::{Severity, StatusMessage};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

/// Receives user-facing messages and the overall success flag of a send
pub trait StatusSink: Send + Sync {
    fn add_message(&self, message: StatusMessage);

    fn set_success(&self, success: bool);
}

/// Snapshot of everything reported for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    pub success: Option<bool>,
    pub messages: Vec<StatusMessage>,
}

/// In-memory sink collecting messages for one request
#[derive(Debug, Default)]
pub struct ResponseMessages {
    inner: Mutex<ResponseSummary>,
}

impl ResponseMessages {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ResponseSummary> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn summary(&self) -> ResponseSummary {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<StatusMessage> {
        self.lock().messages.clone()
    }

    pub fn success(&self) -> Option<bool> {
        self.lock().success
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.lock()
            .messages
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }
}

impl StatusSink for ResponseMessages {
    fn add_message(&self, message: StatusMessage) {
        self.lock().messages.push(message);
    }

    fn set_success(&self, success: bool) {
        self.lock().success = Some(success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_messages_in_order() {
        let sink = ResponseMessages::new();
        assert!(sink.success().is_none());

        sink.add_message(StatusMessage::error("first"));
        sink.add_message(StatusMessage::success("second"));
        sink.set_success(false);

        let summary = sink.summary();
        assert_eq!(summary.success, Some(false));
        assert_eq!(summary.messages[0].message, "first");
        assert_eq!(summary.messages[1].message, "second");
        assert_eq!(sink.count(Severity::Error), 1);
        assert_eq!(sink.count(Severity::Success), 1);
    }
}
