//! User-settings status stream.
//!
//! Status pushes arrive while the settings backend is saving or syncing
//! the user's filter configuration; the page surfaces the busy state as a
//! single dismissible notification.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Status codes emitted by the settings backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsStatusCode {
    /// Settings are being saved or synced; the only code that triggers a
    /// notification.
    Processing,
    Ready,
    Failed,
}

/// One status emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsStatus {
    pub code: SettingsStatusCode,
    pub message: String,
}

impl SettingsStatus {
    pub fn new(code: SettingsStatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Source of user-settings status emissions.
pub trait UserSettingsService: Send + Sync {
    fn status_stream(&self) -> broadcast::Receiver<SettingsStatus>;
}

/// Channel capacity of the status broadcast.
const STATUS_CAPACITY: usize = 64;

/// [`UserSettingsService`] backed by a `tokio::sync::broadcast` channel.
pub struct BroadcastSettingsService {
    sender: broadcast::Sender<SettingsStatus>,
}

impl BroadcastSettingsService {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(STATUS_CAPACITY);
        Self { sender }
    }

    /// Push a status to all subscribers. Dropped silently when nobody
    /// listens.
    pub fn push(&self, status: SettingsStatus) {
        let _ = self.sender.send(status);
    }
}

impl Default for BroadcastSettingsService {
    fn default() -> Self {
        Self::new()
    }
}

impl UserSettingsService for BroadcastSettingsService {
    fn status_stream(&self) -> broadcast::Receiver<SettingsStatus> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_pushed_statuses() {
        let service = BroadcastSettingsService::new();
        let mut rx = service.status_stream();

        service.push(SettingsStatus::new(SettingsStatusCode::Processing, "saving"));

        let status = rx.recv().await.unwrap();
        assert_eq!(status.code, SettingsStatusCode::Processing);
        assert_eq!(status.message, "saving");
    }

    #[test]
    fn push_without_subscribers_does_not_panic() {
        let service = BroadcastSettingsService::new();
        service.push(SettingsStatus::new(SettingsStatusCode::Ready, "done"));
    }
}
