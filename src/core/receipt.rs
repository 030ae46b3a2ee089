//! Per-call event receipts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted by a single successful call, in emission order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt<E> {
    pub events: Vec<E>,
}

impl<E> Receipt<E> {
    /// An empty receipt
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Record an event
    pub fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// Whether any event satisfies `pred`
    pub fn contains(&self, pred: impl Fn(&E) -> bool) -> bool {
        self.events.iter().any(pred)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<E> Default for Receipt<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// An event stamped with the time of the call that emitted it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logged<E> {
    pub at: DateTime<Utc>,
    pub event: E,
}

/// Append every event of `receipt` to `log`, stamped with `at`
pub fn append_to_log<E: Clone>(
    log: &mut Vec<Logged<E>>,
    receipt: &Receipt<E>,
    at: DateTime<Utc>,
) {
    log.extend(
        receipt
            .events
            .iter()
            .cloned()
            .map(|event| Logged { at, event }),
    );
}
