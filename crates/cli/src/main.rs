//! `lanyard` -- command-line access to an event's badge templates.
//!
//! # Environment variables
//!
//! | Variable                       | Required | Default                     | Description                          |
//! |--------------------------------|----------|-----------------------------|--------------------------------------|
//! | `LANYARD_API_URL`              | no       | `http://localhost:3000/api` | Base URL of the badge backend        |
//! | `LANYARD_REQUEST_TIMEOUT_SECS` | no       | `30`                        | Per-request timeout                  |
//! | `LANYARD_LEGACY_TEMPLATE_ID`   | no       | --                          | Locally cached ready-made template id |
//! | `RUST_LOG`                     | no       | `lanyard=info`              | Log filter                           |

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lanyard_client::api::BadgeApi;
use lanyard_client::config::ClientConfig;
use lanyard_core::types::{DbId, TemplateId};
use lanyard_service::poll::PollConfig;
use lanyard_service::service::TemplateService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "lanyard")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Locally cached ready-made template id, used only when neither the
    /// event pointer nor a default flag selects a template
    #[arg(long, global = true, env = "LANYARD_LEGACY_TEMPLATE_ID")]
    legacy_id: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List an event's templates and show the active one
    List { event: String },
    /// Make a template the event's default
    Select {
        event: String,
        template: String,
        /// Poll until the new selection is visible
        #[arg(long)]
        wait: bool,
    },
    /// Re-point the event at an already-default template
    Repair { event: String, template_id: DbId },
    /// Delete a persisted template
    Delete { event: String, template: String },
    /// Print the scale factors for rendering a template into a pixel box
    Scale {
        event: String,
        template: String,
        width_px: f64,
        height_px: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lanyard=info,lanyard_service=info,lanyard_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid client configuration")?;
    let api = BadgeApi::from_config(&config).context("Failed to build HTTP client")?;
    tracing::debug!(api_url = %config.api_url, "Badge API client ready");

    let service = TemplateService::new(Arc::new(api));
    let legacy = cli.legacy_id.as_deref().map(TemplateId::from);

    match cli.command {
        Command::List { event } => commands::list(&service, &event, legacy.as_ref()).await,
        Command::Select {
            event,
            template,
            wait,
        } => {
            let poll = wait.then(PollConfig::default);
            commands::select(&service, &event, &TemplateId::from(template.as_str()), legacy.as_ref(), poll)
                .await
        }
        Command::Repair { event, template_id } => {
            commands::repair(&service, &event, template_id).await
        }
        Command::Delete { event, template } => {
            commands::delete(&service, &event, &TemplateId::from(template.as_str())).await
        }
        Command::Scale {
            event,
            template,
            width_px,
            height_px,
        } => {
            commands::scale(
                &service,
                &event,
                &TemplateId::from(template.as_str()),
                legacy.as_ref(),
                width_px,
                height_px,
            )
            .await
        }
    }
}
