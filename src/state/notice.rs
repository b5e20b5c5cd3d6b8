//! Notices
//!
//! Transient user-facing messages produced by state operations and drained
//! by the UI.

use std::collections::VecDeque;
use std::sync::Arc;

/// Severity level for UI notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationSeverity {
    /// Informational message (auto-dismiss)
    Info,
    /// Success message (auto-dismiss)
    Success,
    /// Warning message (persist until dismissed)
    Warning,
    /// Error message (persist until dismissed)
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: Arc<str>,
    pub severity: NotificationSeverity,
}

/// Pending notices, oldest first
#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, severity: NotificationSeverity, message: impl Into<Arc<str>>) {
        self.queue.push_back(Notice {
            message: message.into(),
            severity,
        });
    }

    pub fn info(&mut self, message: impl Into<Arc<str>>) {
        self.push(NotificationSeverity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<Arc<str>>) {
        self.push(NotificationSeverity::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<Arc<str>>) {
        self.push(NotificationSeverity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<Arc<str>>) {
        self.push(NotificationSeverity::Error, message);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn peek(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    /// Take every pending notice
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}
