//! Transient user notifications ("toasts").

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Records every notification; views show the ones still inside their TTL.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        lock(&self.entries).clone()
    }

    pub fn last(&self) -> Option<Notification> {
        lock(&self.entries).last().cloned()
    }

    /// Notifications younger than `ttl`, newest first. Older ones are
    /// dropped from the log.
    pub fn active(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<Notification> {
        let mut entries = lock(&self.entries);
        entries.retain(|n| now - n.at < ttl);
        entries.iter().rev().cloned().collect()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, level: Level, message: &str) {
        lock(&self.entries).push(Notification {
            level,
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}
