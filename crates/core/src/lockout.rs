//! # Lockout Module
//!
//! Login lockout state machine per customer credential.
//!
//! ```text
//!   Unlocked(n) --fail, n+1 < threshold--> Unlocked(n+1)
//!   Unlocked(n) --fail, n+1 = threshold--> Locked(now + window)
//!   Unlocked(n) --success--------------> Unlocked(0)
//!   Locked(t)   --any attempt, now < t--> Locked(t)      (no credential check)
//!   Locked(t)   --now >= t--------------> Unlocked(0)
//! ```
//!
//! The store applies the failure transition in a single UPDATE statement;
//! this module supplies the policy values and interprets stored records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Số lần sai liên tiếp trước khi khóa
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;

/// Thời gian khóa (phút)
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub threshold: u32,
    pub window: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOCKOUT_THRESHOLD,
            window: Duration::minutes(DEFAULT_LOCKOUT_MINUTES),
        }
    }
}

impl LockoutPolicy {
    pub fn new(threshold: u32, window_minutes: i64) -> Self {
        Self {
            threshold: threshold.max(1),
            window: Duration::minutes(window_minutes.max(1)),
        }
    }

    /// Thời điểm hết khóa nếu lần sai hiện tại kích hoạt lockout
    pub fn lock_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.window
    }

    /// Số lần thử còn lại trước khi bị khóa
    pub fn remaining_attempts(&self, state: LockoutState) -> u32 {
        match state {
            LockoutState::Unlocked { failed_attempts } => {
                self.threshold.saturating_sub(failed_attempts)
            }
            LockoutState::Locked { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LockoutState {
    Unlocked { failed_attempts: u32 },
    Locked { until: DateTime<Utc> },
}

impl LockoutState {
    pub fn unlocked() -> Self {
        LockoutState::Unlocked { failed_attempts: 0 }
    }

    /// Interpret the stored `(failed_attempts, locked_until)` pair at `now`.
    ///
    /// An expired lock reads as `Unlocked(0)`.
    pub fn from_record(
        failed_attempts: u32,
        locked_until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match locked_until {
            Some(until) if now < until => LockoutState::Locked { until },
            Some(_) => LockoutState::unlocked(),
            None => LockoutState::Unlocked { failed_attempts },
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, LockoutState::Locked { .. })
    }
}
