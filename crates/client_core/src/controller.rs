//! Transform Request Controller: editable fields, the request cycle, and
//! reconciliation of asynchronous results into display state.
//!
//! Every cycle is tagged with a sequence number. Only the result of the most
//! recently issued cycle is written to the transformed payload; results of
//! older cycles are discarded once they resolve.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::{
    domain::{OutputFormat, SourceSystem, TransformRequest},
    error::{TransformError, TransformErrorKind, TRANSFORM_ERROR_TEXT},
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::{debounce::Debouncer, transport::TransformTransport};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const TRIGGER_LABEL_IDLE: &str = "Transform Webhook";
pub const TRIGGER_LABEL_PENDING: &str = "Transforming...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub debounce: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Success,
    Failed(TransformErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub seq: u64,
    pub outcome: CycleOutcome,
    /// False when a newer cycle was issued before this one resolved.
    pub applied: bool,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    CycleStarted {
        seq: u64,
        request: TransformRequest,
    },
    CycleApplied {
        seq: u64,
        outcome: CycleOutcome,
        transformed_payload: String,
        in_flight: bool,
    },
    CycleDiscarded {
        seq: u64,
        latest_issued: u64,
        in_flight: bool,
    },
    /// The cycle's future was dropped before the transport answered.
    CycleAbandoned { seq: u64, in_flight: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerControl {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    pub payload: String,
    pub source: SourceSystem,
    pub format: OutputFormat,
    pub transformed_payload: String,
    pub in_flight: bool,
}

impl ControllerSnapshot {
    pub fn trigger_control(&self) -> TriggerControl {
        trigger_control(self.in_flight)
    }
}

pub fn trigger_control(in_flight: bool) -> TriggerControl {
    if in_flight {
        TriggerControl {
            label: TRIGGER_LABEL_PENDING,
            enabled: false,
        }
    } else {
        TriggerControl {
            label: TRIGGER_LABEL_IDLE,
            enabled: true,
        }
    }
}

#[derive(Default)]
struct ControllerState {
    payload: String,
    source: SourceSystem,
    format: OutputFormat,
    transformed_payload: String,
    last_issued: u64,
    last_applied: u64,
    outstanding: usize,
}

impl ControllerState {
    fn in_flight(&self) -> bool {
        self.outstanding > 0
    }
}

struct ControllerShared {
    transport: Arc<dyn TransformTransport>,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

/// Settles the in-flight bookkeeping of a cycle whose future is dropped early.
struct CycleGuard<'a> {
    shared: &'a ControllerShared,
    seq: u64,
    armed: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.abandon_cycle(self.seq);
        }
    }
}

impl ControllerShared {
    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_cycle(&self, request: &TransformRequest) -> u64 {
        let seq = {
            let mut state = self.lock_state();
            state.last_issued += 1;
            state.outstanding += 1;
            state.last_issued
        };
        let _ = self.events.send(ControllerEvent::CycleStarted {
            seq,
            request: request.clone(),
        });
        seq
    }

    async fn run_cycle(&self, request: TransformRequest) -> CycleReport {
        let seq = self.begin_cycle(&request);
        let mut guard = CycleGuard {
            shared: self,
            seq,
            armed: true,
        };
        info!(
            seq,
            source = %request.source,
            format = %request.format,
            payload_bytes = request.payload.len(),
            "issuing transform request"
        );

        let result = self
            .transport
            .transform(&request)
            .await
            .and_then(|value| serde_json::to_string_pretty(&value).map_err(TransformError::from));
        guard.armed = false;

        let (outcome, text) = match result {
            Ok(pretty) => (CycleOutcome::Success, pretty),
            Err(err) => {
                error!(
                    seq,
                    source = %request.source,
                    format = %request.format,
                    kind = ?err.kind(),
                    error = %err,
                    "error transforming webhook"
                );
                (CycleOutcome::Failed(err.kind()), TRANSFORM_ERROR_TEXT.to_string())
            }
        };

        self.finish_cycle(seq, outcome, text)
    }

    fn finish_cycle(&self, seq: u64, outcome: CycleOutcome, text: String) -> CycleReport {
        let mut state = self.lock_state();
        state.outstanding = state.outstanding.saturating_sub(1);
        let in_flight = state.in_flight();
        let latest_issued = state.last_issued;
        let applied = seq == latest_issued;

        let event = if applied {
            state.transformed_payload = text.clone();
            state.last_applied = seq;
            info!(seq, ?outcome, in_flight, "applied transform result");
            ControllerEvent::CycleApplied {
                seq,
                outcome,
                transformed_payload: text,
                in_flight,
            }
        } else {
            warn!(seq, latest_issued, "discarding stale transform result");
            ControllerEvent::CycleDiscarded {
                seq,
                latest_issued,
                in_flight,
            }
        };
        drop(state);

        let _ = self.events.send(event);
        CycleReport {
            seq,
            outcome,
            applied,
        }
    }

    fn abandon_cycle(&self, seq: u64) {
        let in_flight = {
            let mut state = self.lock_state();
            state.outstanding = state.outstanding.saturating_sub(1);
            state.in_flight()
        };
        warn!(seq, "transform cycle dropped before completion");
        let _ = self
            .events
            .send(ControllerEvent::CycleAbandoned { seq, in_flight });
    }
}

pub struct TransformController {
    shared: Arc<ControllerShared>,
    trigger: Debouncer<TransformRequest>,
}

impl TransformController {
    pub fn new(transport: Arc<dyn TransformTransport>, settings: ControllerSettings) -> Self {
        let (events, _) = broadcast::channel(256);
        let shared = Arc::new(ControllerShared {
            transport,
            state: Mutex::new(ControllerState::default()),
            events,
        });

        // Built once per controller; the request travels as the call argument
        // so field edits never require a new debouncer.
        let cycle_shared = Arc::clone(&shared);
        let trigger = Debouncer::new(settings.debounce, move |request: TransformRequest| {
            let shared = Arc::clone(&cycle_shared);
            tokio::spawn(async move {
                shared.run_cycle(request).await;
            });
        });

        Self { shared, trigger }
    }

    pub fn debounce(&self) -> Duration {
        self.trigger.delay()
    }

    pub fn set_payload(&self, payload: impl Into<String>) {
        let payload = payload.into();
        debug!(payload_bytes = payload.len(), "payload edited");
        self.shared.lock_state().payload = payload;
    }

    pub fn set_source(&self, source: SourceSystem) {
        debug!(%source, "source selected");
        self.shared.lock_state().source = source;
    }

    pub fn set_format(&self, format: OutputFormat) {
        debug!(%format, "format selected");
        self.shared.lock_state().format = format;
    }

    pub fn payload(&self) -> String {
        self.shared.lock_state().payload.clone()
    }

    pub fn source(&self) -> SourceSystem {
        self.shared.lock_state().source
    }

    pub fn format(&self) -> OutputFormat {
        self.shared.lock_state().format
    }

    pub fn transformed_payload(&self) -> String {
        self.shared.lock_state().transformed_payload.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.shared.lock_state().in_flight()
    }

    /// Sequence number of the cycle whose result is currently displayed, 0 if none.
    pub fn last_applied_seq(&self) -> u64 {
        self.shared.lock_state().last_applied
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.shared.lock_state();
        ControllerSnapshot {
            payload: state.payload.clone(),
            source: state.source,
            format: state.format,
            transformed_payload: state.transformed_payload.clone(),
            in_flight: state.in_flight(),
        }
    }

    pub fn current_request(&self) -> TransformRequest {
        let state = self.shared.lock_state();
        TransformRequest::new(state.source, state.format, state.payload.clone())
    }

    /// Debounced trigger: captures the fields now, runs one cycle once the quiet
    /// window passes without another trigger.
    pub fn trigger_transform(&self) {
        let request = self.current_request();
        debug!(
            source = %request.source,
            format = %request.format,
            debounce = ?self.trigger.delay(),
            "transform scheduled"
        );
        self.trigger.call(request);
    }

    pub fn has_pending_trigger(&self) -> bool {
        self.trigger.is_pending()
    }

    pub fn cancel_pending(&self) -> bool {
        self.trigger.cancel()
    }

    /// Runs one request cycle immediately. Overlapping calls are not suppressed.
    pub async fn transform_now(&self) -> CycleReport {
        let request = self.current_request();
        self.shared.run_cycle(request).await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.shared.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
