//! Trailing-edge debounce.
//!
//! A pushed value is held until the quiescence window elapses with no newer
//! push. A newer push replaces the pending value and restarts the window, so
//! a burst yields exactly one value: the last one.
//!
//! The state machine takes the current time as an argument instead of owning
//! a timer. The async driver in [`crate::session`] sleeps until
//! [`Debouncer::deadline`]; tests step a paused tokio clock.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Schedule `value` for `now + window`, superseding any pending value.
    /// Returns `true` if a pending value was superseded.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        let deadline = now + self.window;
        let superseded = self.pending.replace((value, deadline)).is_some();
        tracing::trace!(
            superseded,
            window_ms = self.window.as_millis() as u64,
            "Debounce scheduled"
        );
        superseded
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}
