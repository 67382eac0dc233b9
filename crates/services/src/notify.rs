//! Transient user-visible notifications.
//!
//! The page guarantees at most one active notification; this module only
//! supplies the sink it shows and removes them through.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Handle of a displayed notification.
pub type NotificationId = u64;

/// Display options for a single notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationOptions {
    /// Whether tapping the notification dismisses it.
    pub tap_to_dismiss: bool,
}

/// Sink the page shows status notifications through.
pub trait NotificationSink: Send + Sync {
    fn show(&self, message: &str, options: NotificationOptions) -> NotificationId;

    /// Remove a previously shown notification. Removing an already-gone
    /// handle is a no-op.
    fn remove(&self, id: NotificationId);
}

/// [`NotificationSink`] that records shown messages and tracks which
/// handles are still active, for assertions in tests and inspection in the
/// demo.
#[derive(Default)]
pub struct RecordingNotifier {
    next_id: AtomicU64,
    active: Mutex<HashSet<NotificationId>>,
    shown: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Number of notifications currently displayed.
    pub fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    /// Every message shown so far, in order.
    pub fn shown_messages(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn show(&self, message: &str, options: NotificationOptions) -> NotificationId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.active.lock().unwrap().insert(id);
        self.shown.lock().unwrap().push(message.to_string());
        tracing::debug!(id, tap_to_dismiss = options.tap_to_dismiss, %message, "Notification shown");
        id
    }

    fn remove(&self, id: NotificationId) {
        let removed = self.active.lock().unwrap().remove(&id);
        if removed {
            tracing::debug!(id, "Notification removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_and_remove_track_active_set() {
        let notifier = RecordingNotifier::default();
        let a = notifier.show("saving", NotificationOptions { tap_to_dismiss: true });
        let b = notifier.show("still saving", NotificationOptions::default());
        assert_eq!(notifier.active_count(), 2);

        notifier.remove(a);
        assert_eq!(notifier.active_count(), 1);

        // Double-remove is a no-op.
        notifier.remove(a);
        assert_eq!(notifier.active_count(), 1);

        notifier.remove(b);
        assert_eq!(notifier.active_count(), 0);
        assert_eq!(notifier.shown_messages(), vec!["saving", "still saving"]);
    }
}
