//! # Mock Implementations
//!
//! | Mock | Stands in for | Key abilities |
//! |------|---------------|---------------|
//! | `MockTransport` | `HttpTransport` | per-path scripted answers, call tracking |
//! | `RecordingHooks` | `Navigator` + `Notifier` | records navigations and notices |

mod hooks;
mod transport;

pub use hooks::RecordingHooks;
pub use transport::MockTransport;

use parking_lot::Mutex;
use std::sync::Arc;

/// One recorded call
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub method: String,
    pub args: Vec<String>,
}

impl CallRecord {
    pub fn new(method: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Shared call log with assertion helpers
#[derive(Debug, Default, Clone)]
pub struct MockCallTracker {
    calls: Arc<Mutex<Vec<CallRecord>>>,
}

impl MockCallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, method: impl Into<String>, args: Vec<String>) {
        self.calls.lock().push(CallRecord::new(method, args));
    }

    pub fn get_calls(&self) -> Vec<CallRecord> {
        self.calls.lock().clone()
    }

    pub fn get_calls_for(&self, method: &str) -> Vec<CallRecord> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.method == method).count()
    }

    pub fn assert_call_count(&self, method: &str, expected: usize) {
        let actual = self.call_count(method);
        assert_eq!(
            actual, expected,
            "Expected '{}' to be called {} times, but was called {} times",
            method, expected, actual
        );
    }

    pub fn assert_called(&self, method: &str) {
        assert!(
            self.call_count(method) > 0,
            "Expected '{}' to be called at least once, but was never called",
            method
        );
    }

    pub fn assert_not_called(&self, method: &str) {
        let count = self.call_count(method);
        assert_eq!(
            count, 0,
            "Expected '{}' to never be called, but was called {} times",
            method, count
        );
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_tracker_basic() {
        let tracker = MockCallTracker::new();
        tracker.record("auth/login", vec!["POST".to_string()]);
        tracker.record("auth/me", vec!["GET".to_string()]);
        tracker.record("auth/login", vec!["POST".to_string()]);

        let logins = tracker.get_calls_for("auth/login");
        assert_eq!(logins.len(), 2);
        assert!(logins.iter().all(|call| call.args == vec!["POST".to_string()]));
        tracker.clear();
        tracker.record("auth/login", vec!["POST".to_string()]);
        tracker.record("auth/login", vec!["POST".to_string()]);

        assert_eq!(tracker.call_count("auth/login"), 2);
        assert_eq!(tracker.call_count("auth/me"), 0);
        tracker.assert_call_count("auth/login", 2);
        tracker.assert_called("auth/login");
        tracker.assert_not_called("auth/me");

        tracker.clear();
        assert!(tracker.get_calls().is_empty());
    }
}
