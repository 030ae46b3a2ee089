//! Calling convention
//!
//! A caller identity invokes an operation, optionally attaching native
//! value, at a wall-clock instant supplied by the host.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

/// Who is calling, with how much attached value, and when
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Invoking identity
    pub caller: String,
    /// Native value attached to the call
    pub value: u128,
    /// Time of the call
    pub now: DateTime<Utc>,
}

impl CallContext {
    /// Create a context with no attached value
    pub fn new(caller: &str, now: DateTime<Utc>) -> Self {
        Self {
            caller: caller.to_string(),
            value: 0,
            now,
        }
    }

    /// Attach native value to the call
    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}

/// Source of wall-clock time
pub trait Clock {
    /// Current time
    fn now(&self) -> DateTime<Utc>;

    /// Build a context for `caller` stamped with the current time
    fn call(&self, caller: &str) -> CallContext {
        CallContext::new(caller, self.now())
    }
}

/// Real time via `Utc::now()`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for scenarios and tests
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    /// Start the clock at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
