//! # Password Recovery
//!
//! E-mail confirmation polling workflow behind the "forgot password" screen.
//!
//! A submit sends the reset e-mail, then a background loop asks the backend
//! whether the link in that e-mail was clicked. Independently, a one-second
//! cooldown gates the "send again" action.
//!
//! ```text
//! submit ─> POST auth/password/forget
//!              │ 2xx
//!              ├─> poll task:     wait 5s, check, wait 5s, check ... (max 18)
//!              └─> cooldown task: 60, 59, ... 0 -> can resend
//! ```
//!
//! Each cycle owns a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! derived from the workflow's root token; resubmitting cancels the previous
//! cycle and [`EmailConfirmationWorkflow::shutdown`] (or dropping the workflow)
//! cancels them all.

mod hooks;
mod marker;
mod state;
mod workflow;


pub use hooks::{Navigator, Notice, NoticeLevel, Notifier};
pub use marker::{ConfirmationMarker, CONFIRMATION_MARKER};
pub use state::{CooldownTimer, PollState, PollStatus, RecoveryRequest, RecoverySnapshot};
pub use workflow::EmailConfirmationWorkflow;

use std::time::Duration;
use thiserror::Error;

use crate::config::RecoveryConfig;

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid e-mail.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred. Please try again.";
pub const POLL_EXHAUSTED_MESSAGE: &str =
    "We could not confirm your e-mail in time. Please request a new link and try again.";
pub const NOT_REMEMBERED_MESSAGE: &str =
    "The reset e-mail was sent, but this device could not remember it. Finish the reset before closing the app.";

/// Timing and budget of one recovery cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub poll_interval: Duration,
    pub resend_cooldown: Duration,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self::from(&RecoveryConfig::default())
    }
}

impl From<&RecoveryConfig> for RecoveryPolicy {
    fn from(config: &RecoveryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: config.initial_delay,
            poll_interval: config.poll_interval,
            resend_cooldown: config.resend_cooldown,
        }
    }
}

/// Errors of the recovery workflow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    /// Rejected before any request was issued
    #[error("validation failed: {0}")]
    Validation(String),

    /// No response from the backend
    #[error("request could not be completed: {0}")]
    RequestSetup(String),

    /// Backend answered with a non-success status
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Confirmation never observed within the attempt budget
    #[error("e-mail confirmation not observed within the attempt budget")]
    PollExhausted,

    /// A send for this workflow has not completed yet
    #[error("a reset request is already in flight")]
    RequestInFlight,

    /// Resend attempted before the cooldown expired
    #[error("resend not allowed for another {remaining_secs}s")]
    ResendCooldown { remaining_secs: u64 },

    /// The workflow was shut down
    #[error("workflow has been shut down")]
    Closed,
}

impl RecoveryError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::RequestSetup(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
            Self::Server { status: 400, message } => format!("Validation error: {}", message),
            Self::Server { status, .. } => format!(
                "Request failed with status {}. Please try again later.",
                status
            ),
            Self::PollExhausted => POLL_EXHAUSTED_MESSAGE.to_string(),
            Self::RequestInFlight => "A request is already in progress.".to_string(),
            Self::ResendCooldown { remaining_secs } => format!(
                "Please wait {}s before requesting a new link.",
                remaining_secs
            ),
            Self::Closed => "This recovery session has ended.".to_string(),
        }
    }

    /// Notice surfaced for this error
    pub fn notice(&self) -> Notice {
        match self {
            Self::PollExhausted => Notice::warning("Time out", self.user_message()),
            Self::RequestInFlight | Self::ResendCooldown { .. } => {
                Notice::info("Please wait", self.user_message())
            }
            _ => Notice::error("Error", self.user_message()),
        }
    }
}
