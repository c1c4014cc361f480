use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::TransformController;
use shared::domain::{OutputFormat, SourceSystem, TransformRequest};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod oneshot;

use config::{load_settings, SettingsOverrides};
use oneshot::{read_payload, run_one_shot};

/// Paste a webhook payload, pick a source system and an output format, and see
/// what the transform service makes of it.
#[derive(Parser, Debug)]
#[command(name = "webhook-transformer", version)]
struct Args {
    /// Base URL of the transform service.
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file; defaults to ./transformer.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = SourceSystem::Default)]
    source: SourceSystem,
    #[arg(long, default_value_t = OutputFormat::Default)]
    format: OutputFormat,
    /// Payload file for one-shot mode; `-` or absent reads stdin.
    #[arg(long)]
    payload_file: Option<PathBuf>,
    /// Line-oriented console with debounced transforms.
    #[arg(long, short)]
    interactive: bool,
    #[arg(long)]
    debounce_ms: Option<u64>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let overrides = SettingsOverrides {
        server_url: args.server_url,
        debounce_ms: args.debounce_ms,
        request_timeout_secs: args.timeout_secs,
    };
    let settings = load_settings(args.config.as_deref(), overrides)?;

    let transport = Arc::new(
        settings
            .build_transport()
            .context("failed to configure transform endpoint")?,
    );
    info!(
        endpoint = %transport.endpoint(),
        debounce_ms = settings.debounce_ms,
        timeout_secs = settings.request_timeout_secs,
        "transform client ready"
    );

    if args.interactive {
        let controller = Arc::new(TransformController::new(
            transport,
            settings.controller_settings(),
        ));
        controller.set_source(args.source);
        controller.set_format(args.format);
        if let Some(path) = args.payload_file.as_deref() {
            controller.set_payload(read_payload(Some(path), tokio::io::stdin()).await?);
        }
        return console::run_interactive(controller).await;
    }

    let payload = read_payload(args.payload_file.as_deref(), tokio::io::stdin()).await?;
    run_one_shot(
        transport,
        TransformRequest::new(args.source, args.format, payload),
        &mut std::io::stdout(),
    )
    .await?;

    Ok(())
}
