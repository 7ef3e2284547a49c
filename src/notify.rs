// Notification sink for human-readable operation outcomes.
//
// The engine calls this fire-and-forget with success/failure messages; a UI
// would render them as toasts, the console logs them.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Error,
}

/// One emitted notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

/// Sink for operation outcomes. Implementations must not fail; delivery is
/// best-effort.
pub trait Notifier {
    fn notify(&self, notice: Notice);

    fn success(&self, title: &str, message: &str) {
        self.notify(Notice {
            severity: Severity::Info,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn failure(&self, title: &str, message: &str) {
        self.notify(Notice {
            severity: Severity::Error,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

/// Notifier that forwards notices to the tracing log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => info!("{}: {}", notice.title, notice.message),
            Severity::Error => warn!("{}: {}", notice.title, notice.message),
        }
    }
}

/// Notifier that records every notice, for tests and UIs that poll.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all recorded notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().expect("notifier mutex poisoned"))
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
    }
}
