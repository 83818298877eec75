use parking_lot::Mutex;

use crate::recovery::{Navigator, Notice, Notifier};

/// Navigator and notifier that only record what they were asked to do
#[derive(Debug, Default)]
pub struct RecordingHooks {
    navigations: Mutex<Vec<String>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    pub fn navigation_count(&self) -> usize {
        self.navigations.lock().len()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn notice_count(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Navigator for RecordingHooks {
    fn navigate_confirmed(&self, email: &str) {
        self.navigations.lock().push(email.to_string());
    }
}

impl Notifier for RecordingHooks {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }
}
