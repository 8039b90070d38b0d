use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// Transient, dismissable message surfaced to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub duration_ms: u32,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn info(title: &str, description: &str, duration_ms: u32) -> Self {
        Self::build(title, description, NotificationVariant::Default, duration_ms)
    }

    pub fn destructive(title: &str, description: &str, duration_ms: u32) -> Self {
        Self::build(
            title,
            description,
            NotificationVariant::Destructive,
            duration_ms,
        )
    }

    fn build(
        title: &str,
        description: &str,
        variant: NotificationVariant,
        duration_ms: u32,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant,
            duration_ms,
            created_at: Utc::now(),
        }
    }
}

/// Capability handed to the analyzer and submission sink for user feedback.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// In-memory queue shared between a session and the background tasks it spawns.
///
/// Holds at most [`NotificationQueue::CAPACITY`] entries; the oldest is dropped on overflow.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationQueue {
    pub const CAPACITY: usize = 32;

    /// Remove and return everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        let mut guard = self.pending.lock().expect("notification mutex poisoned");
        guard.drain(..).collect()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.pending
            .lock()
            .expect("notification mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        let mut guard = self.pending.lock().expect("notification mutex poisoned");
        if guard.len() >= Self::CAPACITY {
            guard.pop_front();
        }
        guard.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_queue() {
        let queue = NotificationQueue::default();
        let producer = queue.clone();
        producer.notify(Notification::info("Analyzing Website", "Scanning", 2000));
        producer.notify(Notification::destructive("Analysis Failed", "Retry", 3000));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].title, "Analyzing Website");
        assert_eq!(drained[1].variant, NotificationVariant::Destructive);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn overflow_drops_the_oldest_notifications() {
        let queue = NotificationQueue::default();
        for index in 0..NotificationQueue::CAPACITY + 3 {
            queue.notify(Notification::info(&format!("Notice {index}"), "", 3000));
        }

        let drained = queue.drain();
        assert_eq!(drained.len(), NotificationQueue::CAPACITY);
        assert_eq!(drained[0].title, "Notice 3");
        assert_eq!(
            drained.last().map(|note| note.title.as_str()),
            Some(format!("Notice {}", NotificationQueue::CAPACITY + 2).as_str())
        );
    }
}
