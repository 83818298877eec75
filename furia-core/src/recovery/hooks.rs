//! Callbacks the workflow uses to reach the surrounding application.
//!
//! State transitions invoke the hooks while the workflow holds its state lock.
//! Implementations must return quickly and must not call back into the
//! workflow.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Moves the user on once the e-mail is confirmed. Called at most once per cycle.
pub trait Navigator: Send + Sync {
    fn navigate_confirmed(&self, email: &str);
}

/// Shows a notice to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}
