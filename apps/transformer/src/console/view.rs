//! Text rendering of the form: selectors, trigger control and the two panes.

use std::fmt::Write as _;

use client_core::{
    controller::trigger_control, ControllerEvent, ControllerSnapshot, CycleOutcome, TriggerControl,
};
use shared::domain::{OutputFormat, SourceSystem};

const INPUT_PLACEHOLDER: &str = "Paste your webhook JSON payload here...";
const OUTPUT_PLACEHOLDER: &str = "Transformed payload will appear here...";
const PAYLOAD_PREVIEW_LINES: usize = 12;

pub fn render_trigger(control: TriggerControl) -> String {
    if control.enabled {
        format!("[ {} ]", control.label)
    } else {
        format!("[ {} ] (disabled)", control.label)
    }
}

pub fn render_options(source: SourceSystem, format: OutputFormat) -> String {
    let mut out = String::from("Source\n");
    for candidate in SourceSystem::ALL {
        let marker = if *candidate == source { '*' } else { ' ' };
        let _ = writeln!(out, "  {marker} {:<11} {}", candidate.as_str(), candidate.label());
    }
    out.push_str("Output Format\n");
    for candidate in OutputFormat::ALL {
        let marker = if *candidate == format { '*' } else { ' ' };
        let _ = writeln!(out, "  {marker} {:<11} {}", candidate.as_str(), candidate.label());
    }
    out
}

pub fn render_form(snapshot: &ControllerSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Input Webhook Payload ==");
    if snapshot.payload.is_empty() {
        let _ = writeln!(out, "{INPUT_PLACEHOLDER}");
    } else {
        let total = snapshot.payload.lines().count();
        for line in snapshot.payload.lines().take(PAYLOAD_PREVIEW_LINES) {
            let _ = writeln!(out, "{line}");
        }
        if total > PAYLOAD_PREVIEW_LINES {
            let _ = writeln!(out, "... ({} more lines)", total - PAYLOAD_PREVIEW_LINES);
        }
    }
    let _ = writeln!(
        out,
        "Source: {}   Output Format: {}   {}",
        snapshot.source.label(),
        snapshot.format.label(),
        render_trigger(snapshot.trigger_control())
    );
    out.push_str(&render_output(&snapshot.transformed_payload));
    out
}

pub fn render_output(transformed_payload: &str) -> String {
    let body = if transformed_payload.is_empty() {
        OUTPUT_PLACEHOLDER
    } else {
        transformed_payload
    };
    format!("== Transformed Payload ==\n{body}\n")
}

/// Console line for a controller event, or `None` when nothing changes on screen.
pub fn render_event(event: &ControllerEvent) -> Option<String> {
    match event {
        ControllerEvent::CycleStarted { seq, request } => Some(format!(
            "#{seq} {} -> {} ... {}\n",
            request.source.label(),
            request.format.label(),
            render_trigger(trigger_control(true))
        )),
        ControllerEvent::CycleApplied {
            seq,
            outcome,
            transformed_payload,
            ..
        } => {
            let status = match outcome {
                CycleOutcome::Success => "done",
                CycleOutcome::Failed(_) => "failed",
            };
            Some(format!(
                "#{seq} {status}\n{}",
                render_output(transformed_payload)
            ))
        }
        ControllerEvent::CycleDiscarded {
            seq, latest_issued, ..
        } => Some(format!(
            "#{seq} superseded by #{latest_issued}; result dropped\n"
        )),
        ControllerEvent::CycleAbandoned { .. } => None,
    }
}
