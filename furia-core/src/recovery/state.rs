//! Owned state of one recovery workflow instance.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Lifecycle of one recovery cycle.
///
/// ```text
/// Idle ──submit──> Sending ──2xx──> Polling ──marker──> Confirmed
///                     │                │
///                     └─error─> Failed └─exhausted─> TimedOut
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum PollStatus {
    Idle,
    Sending,
    Polling,
    Confirmed,
    TimedOut,
    Failed(String),
}

impl PollStatus {
    /// No further transition happens without a new submit
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::TimedOut | Self::Failed(_))
    }

    /// A send or a poll cycle is running
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Sending | Self::Polling)
    }
}

impl fmt::Display for PollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Sending => write!(f, "sending"),
            Self::Polling => write!(f, "polling"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// E-mail a cycle was started for. Replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryRequest {
    pub email: String,
}

impl RecoveryRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Progress of the confirmation loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollState {
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub interval: Duration,
    pub status: PollStatus,
}

impl PollState {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            attempts_made: 0,
            max_attempts,
            interval,
            status: PollStatus::Idle,
        }
    }

    /// Start over with the given status and zero attempts
    pub(crate) fn restart(&mut self, status: PollStatus) {
        self.attempts_made = 0;
        self.status = status;
    }

    pub fn attempts_left(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_made)
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts_made >= self.max_attempts
    }
}

/// Countdown gating the resend action.
///
/// Ticks are driven from outside; the timer never goes below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CooldownTimer {
    pub remaining_secs: u64,
    pub active: bool,
}

impl CooldownTimer {
    /// (Re)start the countdown. A zero cooldown is immediately expired.
    pub fn start(&mut self, secs: u64) {
        self.remaining_secs = secs;
        self.active = secs > 0;
    }

    /// Advance by one second. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Freeze the countdown where it is
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn can_resend(&self) -> bool {
        !self.active
    }
}

/// Point-in-time copy of a workflow's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoverySnapshot {
    pub request: Option<RecoveryRequest>,
    pub poll: PollState,
    pub cooldown: CooldownTimer,
}
