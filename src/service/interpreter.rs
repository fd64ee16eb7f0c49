//! Provider response classification
//!
//! Turns whatever the provider call produced into a [`DispatchOutcome`] and
//! reports user-facing messages to the status sink. Never fails.

use crate::domain::{DispatchOutcome, StatusMessage};
use crate::email::{EmailProviderError, ProviderResponse};
use crate::service::status::StatusSink;
use metrics::counter;
use tracing::{error, info, warn};

pub const SENT_MESSAGE: &str = "Mail was sent to provider";
pub const CONNECTIVITY_MESSAGE: &str = "We are unable to connect to the mail provider";
const CONTACT_ADMIN_HINT: &str = "Please contact the super admin.";

/// Classify a provider result.
///
/// Any warning on an accepted send counts as not delivered.
pub fn interpret(
    result: Result<ProviderResponse, EmailProviderError>,
    sink: &dyn StatusSink,
) -> DispatchOutcome {
    match result {
        Ok(response) if response.is_accepted() && response.warnings.is_empty() => {
            info!(
                "Mail accepted by provider (status {}, message id {:?})",
                response.status_code, response.message_id
            );
            counter!("mailersend_dispatch_sends_total", "outcome" => "delivered").increment(1);

            sink.add_message(StatusMessage::success(SENT_MESSAGE));
            sink.set_success(true);
            DispatchOutcome::delivered(SENT_MESSAGE, response.status_code, response.message_id)
        }
        Ok(response) if response.is_accepted() => {
            let warnings: Vec<String> = response
                .warnings
                .iter()
                .map(|w| w.message.clone())
                .collect();
            warn!(
                "Provider accepted mail with {} warning(s): {:?}",
                warnings.len(),
                response.warnings
            );
            counter!("mailersend_dispatch_sends_total", "outcome" => "warning").increment(1);

            for warning in &warnings {
                sink.add_message(StatusMessage::error(format!(
                    "{} {}",
                    warning, CONTACT_ADMIN_HINT
                )));
            }
            sink.set_success(false);

            DispatchOutcome {
                delivered: false,
                user_message: format!(
                    "The mail provider reported {} warning(s). {}",
                    warnings.len(),
                    CONTACT_ADMIN_HINT
                ),
                warnings,
                status_code: Some(response.status_code),
                message_id: response.message_id,
            }
        }
        Ok(response) => {
            error!(
                "Provider rejected mail with status {}: {}",
                response.status_code,
                response.detail.as_deref().unwrap_or("<no detail>")
            );
            report_failure(sink, Some(response.status_code))
        }
        Err(e) => {
            error!("Mail provider call failed: {}", e);
            report_failure(sink, None)
        }
    }
}

fn report_failure(sink: &dyn StatusSink, status_code: Option<u16>) -> DispatchOutcome {
    counter!("mailersend_dispatch_sends_total", "outcome" => "failed").increment(1);
    sink.add_message(StatusMessage::error(CONNECTIVITY_MESSAGE));
    sink.set_success(false);
    DispatchOutcome::failed(CONNECTIVITY_MESSAGE, status_code)
}
