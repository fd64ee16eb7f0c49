//! Mail dispatch service
//!
//! Runs one send end to end: validate → decode recipients → resolve
//! attachments → compose → send → interpret. Validation and resolution
//! failures are returned as errors before the provider is called; whatever
//! the provider does is classified into a [`DispatchOutcome`].

use crate::config::{Config, LimitsConfig};
use crate::domain::{DispatchOutcome, SendRequest, StatusMessage};
use crate::email::{EmailProvider, MailerSendProvider, OutboundMessage};
use crate::error::{AppError, Result};
use crate::file_provider::{FileContentProvider, LocalFileProvider};
use crate::service::attachments::AttachmentResolver;
use crate::service::composer::{compose, ensure_content};
use crate::service::interpreter::interpret;
use crate::service::recipients::RecipientLists;
use crate::service::size::{validate_body_size, validate_payload_size};
use crate::service::status::StatusSink;
use metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Service for sending transactional mail through the provider
pub struct MailDispatchService {
    provider: Arc<dyn EmailProvider>,
    resolver: AttachmentResolver,
    limits: LimitsConfig,
}

impl MailDispatchService {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        file_provider: Arc<dyn FileContentProvider>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            provider,
            resolver: AttachmentResolver::new(file_provider, limits.max_attachment_size_bytes),
            limits,
        }
    }

    /// Wire the MailerSend provider and the local file provider from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = MailerSendProvider::from_config(&config.mailersend)
            .map_err(|e| AppError::Config(format!("Failed to create MailerSend provider: {}", e)))?;
        let file_provider = LocalFileProvider::new(config.attachments.base_dir.clone());

        Ok(
            Self::new(Arc::new(provider), Arc::new(file_provider), config.limits)
                .with_resolve_concurrency(config.attachments.resolve_concurrency),
        )
    }

    pub fn with_resolve_concurrency(mut self, concurrency: usize) -> Self {
        self.resolver = self.resolver.with_concurrency(concurrency);
        self
    }

    /// Send one request.
    ///
    /// Rejections are also reported to `sink` as error messages.
    pub async fn send(
        &self,
        request: &SendRequest,
        sink: &dyn StatusSink,
    ) -> Result<DispatchOutcome> {
        info!(
            "Dispatching mail \"{}\" from {} via {} ({} attachment(s), template={})",
            request.subject,
            request.received_from,
            self.provider.provider_name(),
            request.attachments.len(),
            request.uses_template()
        );

        let message = match self.prepare(request).await {
            Ok(message) => message,
            Err(e) => {
                warn!("Mail request rejected ({}): {}", e.kind(), e);
                counter!("mailersend_dispatch_sends_total", "outcome" => "rejected").increment(1);
                sink.add_message(StatusMessage::error(e.user_message()));
                sink.set_success(false);
                return Err(e);
            }
        };

        let result = self.provider.send(&message).await;
        Ok(interpret(result, sink))
    }

    async fn prepare(&self, request: &SendRequest) -> Result<OutboundMessage> {
        request.validate()?;
        ensure_content(request)?;
        self.validate_sizes(request)?;

        let recipients = RecipientLists::decode(
            request.to.as_deref(),
            request.cc.as_deref(),
            request.bcc.as_deref(),
        )?;

        let attachments = self.resolver.resolve(&request.attachments).await?;

        compose(request, recipients, &attachments)
    }

    /// Size checks that need no I/O, run before any attachment is fetched
    fn validate_sizes(&self, request: &SendRequest) -> Result<()> {
        let max = self.limits.max_body_size_bytes;

        if let Some(body) = &request.body {
            validate_body_size(body, max)?;
        }
        if request.uses_template() {
            if let Some(personalization) = &request.personalization {
                validate_payload_size(personalization, max)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttachmentRef, Severity};
    use crate::email::provider::MockEmailProvider;
    use crate::email::{EmailProviderError, ProviderResponse, ProviderWarning};
    use crate::file_provider::{FileContent, FileProviderError, MockFileContentProvider};
    use crate::service::status::ResponseMessages;
    use serde_json::{Map, Value};

    const MB: u64 = 1024 * 1024;

    fn limits() -> LimitsConfig {
        LimitsConfig {
            max_body_size_bytes: 1024,
            max_attachment_size_bytes: MB,
        }
    }

    fn request() -> SendRequest {
        SendRequest {
            to: Some(r#"[{"email":"a@example.com"},{"email":"b@example.com"}]"#.to_string()),
            received_from: "noreply@example.com".to_string(),
            received_from_name: "Example".to_string(),
            subject: "Hello".to_string(),
            body: Some("<p>Hello</p>".to_string()),
            ..Default::default()
        }
    }

    fn unused_file_provider() -> Arc<MockFileContentProvider> {
        let mut files = MockFileContentProvider::new();
        files.expect_get_file_details().times(0);
        Arc::new(files)
    }

    fn unused_email_provider() -> Arc<MockEmailProvider> {
        let mut provider = MockEmailProvider::new();
        provider.expect_provider_name().return_const("mock");
        provider.expect_send().times(0);
        Arc::new(provider)
    }

    #[tokio::test]
    async fn test_successful_send() {
        let mut provider = MockEmailProvider::new();
        provider.expect_provider_name().return_const("mock");
        provider
            .expect_send()
            .times(1)
            .withf(|message| message.to.len() == 2 && message.html.is_some())
            .returning(|_| Ok(ProviderResponse::new(202).with_message_id("msg-1")));

        let service =
            MailDispatchService::new(Arc::new(provider), unused_file_provider(), limits());
        let sink = ResponseMessages::new();

        let outcome = service.send(&request(), &sink).await.unwrap();

        assert!(outcome.delivered);
        assert_eq!(outcome.message_id.as_deref(), Some("msg-1"));
        assert_eq!(sink.success(), Some(true));
        assert_eq!(sink.count(Severity::Success), 1);
    }

    #[tokio::test]
    async fn test_oversized_body_fails_before_any_io() {
        let service =
            MailDispatchService::new(unused_email_provider(), unused_file_provider(), limits());
        let sink = ResponseMessages::new();

        let request = SendRequest {
            body: Some("x".repeat(2048)),
            attachments: vec![AttachmentRef::new(1), AttachmentRef::new(2)],
            ..request()
        };

        let err = service.send(&request, &sink).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(sink.success(), Some(false));
        assert_eq!(sink.count(Severity::Error), 1);
        assert!(sink.messages()[0].message.starts_with("Body size exceeds"));
    }

    #[tokio::test]
    async fn test_oversized_personalization_fails_in_template_mode() {
        let service =
            MailDispatchService::new(unused_email_provider(), unused_file_provider(), limits());
        let sink = ResponseMessages::new();

        let mut data = Map::new();
        data.insert("blob".to_string(), Value::String("y".repeat(2048)));
        let request = SendRequest {
            body: None,
            template_id: Some("tpl".to_string()),
            personalization: Some(data),
            ..request()
        };

        assert!(service.send(&request, &sink).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_sender_is_rejected() {
        let service =
            MailDispatchService::new(unused_email_provider(), unused_file_provider(), limits());
        let sink = ResponseMessages::new();

        let request = SendRequest {
            received_from: "nobody".to_string(),
            ..request()
        };

        let err = service.send(&request, &sink).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_malformed_recipients_fail_before_attachments() {
        let service =
            MailDispatchService::new(unused_email_provider(), unused_file_provider(), limits());
        let sink = ResponseMessages::new();

        let request = SendRequest {
            cc: Some("not json".to_string()),
            attachments: vec![AttachmentRef::new(1)],
            ..request()
        };

        let err = service.send(&request, &sink).await.unwrap_err();
        assert!(err.to_string().contains("'cc'"));
    }

    #[tokio::test]
    async fn test_file_failure_is_client_error_and_nothing_is_sent() {
        let mut files = MockFileContentProvider::new();
        files
            .expect_get_file_details()
            .times(1)
            .returning(|_| Err(FileProviderError::NotFound("9".to_string())));

        let service = MailDispatchService::new(unused_email_provider(), Arc::new(files), limits());
        let sink = ResponseMessages::new();

        let request = SendRequest {
            attachments: vec![AttachmentRef::new(9), AttachmentRef::new(10)],
            ..request()
        };

        let err = service.send(&request, &sink).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_provider_warnings_are_an_outcome_not_an_error() {
        let mut provider = MockEmailProvider::new();
        provider.expect_provider_name().return_const("mock");
        provider.expect_send().returning(|_| {
            Ok(ProviderResponse::new(202).with_warnings(vec![
                ProviderWarning::new("first"),
                ProviderWarning::new("second"),
            ]))
        });

        let service =
            MailDispatchService::new(Arc::new(provider), unused_file_provider(), limits());
        let sink = ResponseMessages::new();

        let outcome = service.send(&request(), &sink).await.unwrap();

        assert!(!outcome.delivered);
        assert_eq!(outcome.warnings, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(sink.count(Severity::Error), 2);
        assert_eq!(sink.success(), Some(false));
    }

    #[tokio::test]
    async fn test_transport_failure_after_attachments_resolved() {
        let mut files = MockFileContentProvider::new();
        files
            .expect_get_file_details()
            .times(3)
            .returning(|a| Ok(FileContent::new("aGVsbG8=", format!("{}.txt", a.file_id))));

        let mut provider = MockEmailProvider::new();
        provider.expect_provider_name().return_const("mock");
        provider
            .expect_send()
            .withf(|message| message.attachments.len() == 3)
            .returning(|_| Err(EmailProviderError::Timeout("30s elapsed".to_string())));

        let service = MailDispatchService::new(Arc::new(provider), Arc::new(files), limits());
        let sink = ResponseMessages::new();

        let request = SendRequest {
            attachments: (1..=3).map(AttachmentRef::new).collect(),
            ..request()
        };

        let outcome = service.send(&request, &sink).await.unwrap();

        assert!(!outcome.delivered);
        assert_eq!(sink.messages().len(), 1);
        assert_eq!(sink.messages()[0].message, crate::service::interpreter::CONNECTIVITY_MESSAGE);
    }

    #[tokio::test]
    async fn test_template_send_carries_personalization() {
        let mut provider = MockEmailProvider::new();
        provider.expect_provider_name().return_const("mock");
        provider
            .expect_send()
            .withf(|message| {
                message.html.is_none()
                    && message.template_id.as_deref() == Some("tpl-9")
                    && message.personalization.len() == 2
            })
            .returning(|_| Ok(ProviderResponse::new(200)));

        let service =
            MailDispatchService::new(Arc::new(provider), unused_file_provider(), limits());
        let sink = ResponseMessages::new();

        let request = SendRequest {
            template_id: Some("tpl-9".to_string()),
            ..request()
        };

        let outcome = service.send(&request, &sink).await.unwrap();
        assert!(outcome.delivered);
    }
}
