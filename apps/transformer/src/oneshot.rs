//! Non-interactive mode: one payload in, one transformed payload out.

use std::{io::Write, path::Path, sync::Arc};

use anyhow::Context;
use client_core::{
    ControllerSettings, CycleOutcome, CycleReport, TransformController, TransformTransport,
};
use shared::domain::TransformRequest;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::info;

/// Reads the payload from `path`, or from `stdin` when `path` is absent or `-`.
pub async fn read_payload<R>(path: Option<&Path>, mut stdin: R) -> anyhow::Result<String>
where
    R: AsyncRead + Unpin,
{
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read payload file '{}'", path.display())),
        _ => {
            let mut payload = String::new();
            stdin
                .read_to_string(&mut payload)
                .await
                .context("failed to read payload from stdin")?;
            Ok(payload)
        }
    }
}

/// Runs a single request cycle and writes whatever the output pane would show.
///
/// A failed cycle is not an error here: the fallback text is the output.
pub async fn run_one_shot<W: Write>(
    transport: Arc<dyn TransformTransport>,
    request: TransformRequest,
    out: &mut W,
) -> anyhow::Result<CycleReport> {
    let controller = TransformController::new(transport, ControllerSettings::default());
    controller.set_source(request.source);
    controller.set_format(request.format);
    controller.set_payload(request.payload);

    let report = controller.transform_now().await;
    if let CycleOutcome::Failed(kind) = report.outcome {
        info!(?kind, "transform failed; showing fallback text");
    }
    writeln!(out, "{}", controller.transformed_payload())?;
    out.flush()?;
    Ok(report)
}

#[cfg(test)]
#[path = "tests/oneshot_tests.rs"]
mod tests;
