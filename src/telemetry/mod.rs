//! Telemetry initialization: structured logging and metric descriptions

use crate::config::TelemetryConfig;
use metrics::describe_counter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise logging.
///
/// Logs go to stderr, leaving stdout to command output. `RUST_LOG` wins over
/// the default filter. With `log_format = "json"` event
/// fields are flattened so `message` stays top-level.
pub fn init(config: &TelemetryConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mailersend_dispatch=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }

    describe_metrics();
    tracing::debug!("Telemetry initialised for {}", config.service_name);
}

/// Register metric descriptions with whatever recorder the host installed
pub fn describe_metrics() {
    describe_counter!(
        "mailersend_dispatch_sends_total",
        "Send attempts by outcome (delivered, warning, failed, rejected)"
    );
    describe_counter!(
        "mailersend_dispatch_attachments_resolved_total",
        "Attachments fetched and size-checked"
    );
}
