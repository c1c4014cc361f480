//! Quiet-window debouncing of a repeatedly invoked action.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

type Action<A> = Arc<dyn Fn(A) + Send + Sync>;

struct PendingCall {
    fires_at: Instant,
    handle: JoinHandle<()>,
}

/// Collapses bursts of calls into one execution of `action`, run `delay` after
/// the last call with that call's arguments.
///
/// One instance is one identity: a call only ever supersedes calls made on the
/// same `Debouncer`. Scheduling spawns onto the ambient Tokio runtime.
pub struct Debouncer<A> {
    delay: Duration,
    action: Action<A>,
    pending: Mutex<Option<PendingCall>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reschedules the action to run `delay` from now with `args`.
    pub fn call(&self, args: A) {
        let now = Instant::now();
        let mut pending = self.lock_pending();

        if let Some(previous) = pending.take() {
            // A timer that has already reached its deadline belongs to a
            // finished quiet window and is left to fire.
            if now < previous.fires_at {
                previous.handle.abort();
                debug!(delay = ?self.delay, "superseded pending call");
            }
        }

        let action = Arc::clone(&self.action);
        let fires_at = now + self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(fires_at).await;
            action(args);
        });
        *pending = Some(PendingCall { fires_at, handle });
    }

    /// Drops the scheduled execution, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        let Some(previous) = self.lock_pending().take() else {
            return false;
        };
        let was_waiting = !previous.handle.is_finished();
        previous.handle.abort();
        was_waiting
    }

    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<PendingCall>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod tests;
