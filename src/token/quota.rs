//! Per-admin daily mint quota
//!
//! Each admin has a 24-hour window that starts at their first mint after
//! the previous window expired. Resets are computed lazily from the call
//! time; nothing runs in the background.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of a quota window in hours
pub const QUOTA_WINDOW_HOURS: i64 = 24;

/// Default daily quota (TMAX)
pub const DEFAULT_DAILY_QUOTA: u128 = 2_000;

/// Length of a quota window
pub fn window_length() -> Duration {
    Duration::hours(QUOTA_WINDOW_HOURS)
}

/// Amount minted by one admin in their current window
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintWindow {
    /// Minted since `window_start`
    pub minted: u128,
    /// Origin of the window, `None` before the first mint
    pub window_start: Option<DateTime<Utc>>,
}

impl MintWindow {
    /// Whether the window has run out at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.window_start {
            Some(start) => now - start >= window_length(),
            None => true,
        }
    }

    /// The window as it stands at `now`, reset if expired
    pub fn current(&self, now: DateTime<Utc>) -> MintWindow {
        if self.is_expired(now) {
            MintWindow {
                minted: 0,
                window_start: Some(now),
            }
        } else {
            self.clone()
        }
    }

    /// Quota left at `now`
    pub fn remaining(&self, quota: u128, now: DateTime<Utc>) -> u128 {
        quota.saturating_sub(self.current(now).minted)
    }

    /// The window after minting `amount` at `now`, or `None` if that
    /// would exceed `quota`
    pub fn after_mint(
        &self,
        amount: u128,
        quota: u128,
        now: DateTime<Utc>,
    ) -> Option<MintWindow> {
        let mut window = self.current(now);
        let minted = window.minted.checked_add(amount)?;
        if minted > quota {
            return None;
        }
        window.minted = minted;
        Some(window)
    }
}
