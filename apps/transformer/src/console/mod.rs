//! Interactive console: line commands in, rendered form and controller events out.

pub mod commands;
pub mod orchestration;
pub mod view;

use std::{io::Write, sync::Arc};

use client_core::TransformController;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::warn;

use commands::parse_console_command;
use orchestration::{dispatch_console_command, Flow};

pub async fn run_interactive(controller: Arc<TransformController>) -> anyhow::Result<()> {
    let mut events = controller.subscribe_events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();

    write!(out, "{}", view::render_form(&controller.snapshot()))?;
    writeln!(out, "type 'help' for commands")?;
    out.flush()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let cmd = match parse_console_command(&line) {
                    Ok(cmd) => cmd,
                    Err(commands::CommandParseError::Empty) => continue,
                    Err(err) => {
                        writeln!(out, "{err}")?;
                        out.flush()?;
                        continue;
                    }
                };
                match dispatch_console_command(&controller, cmd, &mut out).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(err) => writeln!(out, "error: {err:#}")?,
                }
                out.flush()?;
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(rendered) = view::render_event(&event) {
                            write!(out, "{rendered}")?;
                            out.flush()?;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "console fell behind controller events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    if controller.cancel_pending() {
        warn!("dropped a scheduled transform on exit");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
