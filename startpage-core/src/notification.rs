use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    pub duration_ms: u64,
    pub error_duration_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            duration_ms: 3000,
            error_duration_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: Instant,
    /// `None` stays until dismissed.
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.duration
            .is_some_and(|d| now.saturating_duration_since(self.shown_at) >= d)
    }
}

/// Toast queue: newest last, expired entries dropped by `expire`.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    config: NotificationConfig,
    next_id: u64,
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(config: NotificationConfig) -> Self {
        NotificationCenter {
            config,
            next_id: 0,
            active: Vec::new(),
        }
    }

    pub fn show(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> u64 {
        self.next_id += 1;
        let notification = Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            shown_at: Instant::now(),
            duration,
        };
        tracing::debug!(id = notification.id, kind = ?kind, "Showing notification");
        self.active.push(notification);
        self.next_id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        let duration = self.default_duration();
        self.show(NotificationKind::Success, message, Some(duration))
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        let duration = self.default_duration();
        self.show(NotificationKind::Info, message, Some(duration))
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        let duration = self.default_duration();
        self.show(NotificationKind::Warning, message, Some(duration))
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        let duration = Duration::from_millis(self.config.error_duration_ms);
        self.show(NotificationKind::Error, message, Some(duration))
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Drop expired notifications, returning how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|n| !n.is_expired(now));
        before - self.active.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn default_duration(&self) -> Duration {
        Duration::from_millis(self.config.duration_ms)
    }
}
