//! Terminal implementations of the workflow hooks.

use tokio::sync::Notify;

use furia_core::{Navigator, Notice, NoticeLevel, Notifier};

/// Prints navigations and notices, and wakes the waiting command when the
/// workflow reaches an outcome.
#[derive(Default)]
pub struct ConsoleHooks {
    finished: Notify,
}

impl ConsoleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves after the next confirmation, timeout or failure
    pub async fn finished(&self) {
        self.finished.notified().await
    }
}

impl Navigator for ConsoleHooks {
    fn navigate_confirmed(&self, email: &str) {
        println!("✅ {} confirmed.", email);
        println!("   Choose a new password with `furia reset-password`.");
        self.finished.notify_one();
    }
}

impl Notifier for ConsoleHooks {
    fn notify(&self, notice: &Notice) {
        let icon = match notice.level {
            NoticeLevel::Info => "ℹ️ ",
            NoticeLevel::Warning => "⚠️ ",
            NoticeLevel::Error => "❌",
        };
        eprintln!("{} {}: {}", icon, notice.title, notice.message);
        if notice.level != NoticeLevel::Info {
            self.finished.notify_one();
        }
    }
}
