//! Common test utilities

use mailersend_dispatch::config::{LimitsConfig, MailerSendConfig};
use mailersend_dispatch::domain::SendRequest;
use mailersend_dispatch::email::MailerSendProvider;
use mailersend_dispatch::file_provider::LocalFileProvider;
use mailersend_dispatch::MailDispatchService;
use std::path::Path;
use std::sync::Arc;

pub const TEST_API_KEY: &str = "mlsn.test-key";

pub fn create_test_config(base_url: &str) -> MailerSendConfig {
    MailerSendConfig {
        api_key: TEST_API_KEY.to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 2,
    }
}

pub fn create_test_provider(base_url: &str) -> MailerSendProvider {
    MailerSendProvider::from_config(&create_test_config(base_url))
        .expect("test provider should build")
}

pub fn create_test_service(base_url: &str, attachment_dir: &Path) -> MailDispatchService {
    MailDispatchService::new(
        Arc::new(create_test_provider(base_url)),
        Arc::new(LocalFileProvider::new(attachment_dir)),
        LimitsConfig::from_megabytes(1, 1).expect("limits fit in bytes"),
    )
}

pub fn sample_request() -> SendRequest {
    SendRequest {
        to: Some(
            r#"[{"email":"ada@example.com","name":"Ada"},{"email":"bob@example.com"}]"#
                .to_string(),
        ),
        cc: Some(r#"[{"email":"cc@example.com"}]"#.to_string()),
        received_from: "noreply@example.com".to_string(),
        received_from_name: "Example App".to_string(),
        subject: "Your report".to_string(),
        body: Some("<p>See attached</p>".to_string()),
        ..Default::default()
    }
}
