use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mailersend_dispatch::domain::SendRequest;
use mailersend_dispatch::service::ResponseMessages;
use mailersend_dispatch::{config::Config, telemetry, MailDispatchService};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "mailersend-dispatch",
    version,
    about = "Send transactional mail through MailerSend"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send one request described by a JSON file
    Send {
        /// Path to the send-request JSON
        #[arg(long)]
        request: PathBuf,

        /// Directory attachments are read from (overrides MAIL_ATTACHMENT_DIR)
        #[arg(long)]
        attachment_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    telemetry::init(&config.telemetry);

    match cli.command {
        Command::Send {
            request,
            attachment_dir,
        } => {
            if let Some(dir) = attachment_dir {
                config.attachments.base_dir = dir;
            }

            let raw = tokio::fs::read_to_string(&request)
                .await
                .with_context(|| format!("Failed to read {}", request.display()))?;
            let request: SendRequest =
                serde_json::from_str(&raw).context("Invalid send request JSON")?;

            let service = MailDispatchService::from_config(&config)?;
            let sink = ResponseMessages::new();

            let (delivered, report) = match service.send(&request, &sink).await {
                Ok(outcome) => (
                    outcome.delivered,
                    json!({ "outcome": outcome, "status": sink.summary() }),
                ),
                Err(e) => (
                    false,
                    json!({
                        "error": { "kind": e.kind(), "message": e.user_message() },
                        "status": sink.summary(),
                    }),
                ),
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
            info!("Done (delivered={})", delivered);

            if !delivered {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
