//! Headless notification and navigation sinks.

use std::sync::Mutex;

use crate::session::{Navigator, Notice, Notifier};

/// Emits notices as `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::warn!(
            code = %notice.code,
            duration_ms = notice.duration.as_millis() as u64,
            "{}",
            notice.message
        );
    }
}

/// Remembers the last location navigated to.
#[derive(Debug)]
pub struct LocationNavigator {
    location: Mutex<String>,
}

impl LocationNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            location: Mutex::new(start.into()),
        }
    }

    pub fn current(&self) -> String {
        match self.location.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for LocationNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for LocationNavigator {
    fn go_to(&self, path: &str) {
        tracing::info!(path, "Navigating");
        match self.location.lock() {
            Ok(mut guard) => *guard = path.to_string(),
            Err(poisoned) => *poisoned.into_inner() = path.to_string(),
        }
    }
}
