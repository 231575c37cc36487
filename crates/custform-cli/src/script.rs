//! Timed event scripts.
//!
//! A script is a JSON array of steps, each carrying the offset in
//! milliseconds at which its event happens:
//!
//! ```json
//! [
//!   {"at_ms": 0,   "event": {"input": {"path": "emailGroup.email", "value": "a@"}}},
//!   {"at_ms": 200, "event": {"touch": {"path": "emailGroup.email"}}},
//!   {"at_ms": 400, "event": "add_address"}
//! ]
//! ```

use custform_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub at_ms: u64,
    pub event: FormEvent,
}

/// An email message produced while replaying, stamped with its offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedMessage {
    pub at_ms: u64,
    pub message: String,
}

/// Parse a script, ordering steps by time. Steps sharing an offset keep
/// their written order.
pub fn parse(json: &str) -> serde_json::Result<Vec<ScriptStep>> {
    let mut steps: Vec<ScriptStep> = serde_json::from_str(json)?;
    steps.sort_by_key(|step| step.at_ms);
    Ok(steps)
}

/// Replay `steps` on a virtual clock. No real time passes: each debounced
/// evaluation fires at its deadline, in order with the events around it.
pub fn replay(session: &mut FormSession, steps: &[ScriptStep]) -> Vec<TimedMessage> {
    let base = Instant::now();
    let mut messages = Vec::new();

    for step in steps {
        let at = base + Duration::from_millis(step.at_ms);
        fire_due(session, base, at, &mut messages);
        if let Err(e) = session.handle(step.event.clone(), at) {
            tracing::warn!(at_ms = step.at_ms, error = %e, "Skipping script step");
        }
    }

    if let Some(deadline) = session.next_deadline() {
        fire_due(session, base, deadline, &mut messages);
    }
    messages
}

fn fire_due(
    session: &mut FormSession,
    base: Instant,
    until: Instant,
    messages: &mut Vec<TimedMessage>,
) {
    while let Some(deadline) = session.next_deadline().filter(|d| *d <= until) {
        if let Some(message) = session.poll(deadline) {
            messages.push(TimedMessage {
                at_ms: deadline.duration_since(base).as_millis() as u64,
                message,
            });
        }
    }
}

/// Replay `steps` in real time through [`FormSession::drive`].
pub async fn replay_realtime(
    session: &mut FormSession,
    steps: Vec<ScriptStep>,
) -> Vec<TimedMessage> {
    let (tx, rx) = mpsc::channel(steps.len().max(1));
    let base = Instant::now();

    let feeder = tokio::spawn(async move {
        for step in steps {
            tokio::time::sleep_until(base + Duration::from_millis(step.at_ms)).await;
            if tx.send(step.event).await.is_err() {
                break;
            }
        }
    });

    let mut messages = Vec::new();
    session
        .drive(rx, |message| {
            messages.push(TimedMessage {
                at_ms: base.elapsed().as_millis() as u64,
                message: message.to_string(),
            })
        })
        .await;

    if let Err(e) = feeder.await {
        tracing::error!(error = %e, "Script feeder failed");
    }
    messages
}
