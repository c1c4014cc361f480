//! Command orchestration from console input to the transform controller.

use std::{io::Write, sync::Arc};

use anyhow::Context;
use client_core::TransformController;

use crate::console::{
    commands::{ConsoleCommand, HELP_TEXT},
    view,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn dispatch_console_command<W: Write>(
    controller: &Arc<TransformController>,
    cmd: ConsoleCommand,
    out: &mut W,
) -> anyhow::Result<Flow> {
    let cmd_name = cmd.name();
    tracing::debug!(command = cmd_name, "dispatching console command");

    match cmd {
        ConsoleCommand::SetPayload(text) => {
            let bytes = text.len();
            controller.set_payload(text);
            writeln!(out, "payload set ({bytes} bytes)")?;
        }
        ConsoleCommand::LoadPayload(path) => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read payload file '{}'", path.display()))?;
            let bytes = text.len();
            controller.set_payload(text);
            writeln!(out, "payload loaded from {} ({bytes} bytes)", path.display())?;
        }
        ConsoleCommand::SetSource(source) => {
            controller.set_source(source);
            writeln!(out, "source: {}", source.label())?;
        }
        ConsoleCommand::SetFormat(format) => {
            controller.set_format(format);
            writeln!(out, "output format: {}", format.label())?;
        }
        ConsoleCommand::Transform => {
            if trigger_enabled(controller, out)? {
                controller.trigger_transform();
                writeln!(
                    out,
                    "transform scheduled in {}ms",
                    controller.debounce().as_millis()
                )?;
            }
        }
        ConsoleCommand::TransformNow => {
            if trigger_enabled(controller, out)? {
                let controller = Arc::clone(controller);
                tokio::spawn(async move {
                    controller.transform_now().await;
                });
            }
        }
        ConsoleCommand::Show => {
            write!(out, "{}", view::render_form(&controller.snapshot()))?;
            let seq = controller.last_applied_seq();
            if seq > 0 {
                writeln!(out, "(result of request #{seq})")?;
            }
        }
        ConsoleCommand::Options => {
            write!(
                out,
                "{}",
                view::render_options(controller.source(), controller.format())
            )?;
        }
        ConsoleCommand::Help => {
            writeln!(out, "{HELP_TEXT}")?;
        }
        ConsoleCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// The trigger control is disabled while a request is in flight.
fn trigger_enabled<W: Write>(
    controller: &TransformController,
    out: &mut W,
) -> anyhow::Result<bool> {
    let control = controller.snapshot().trigger_control();
    if !control.enabled {
        writeln!(
            out,
            "{} is unavailable until the current request finishes",
            view::render_trigger(control)
        )?;
    }
    Ok(control.enabled)
}
