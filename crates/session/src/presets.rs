//! Preset coordination and settings-status notifications.
//!
//! Two page-scoped background tasks, both torn down through the session's
//! cancellation token:
//!
//! - the preset combiner keeps a `PresetGroupView` watch channel equal to
//!   the latest preset group combined with the latest default filter
//!   state, recombining whenever either side emits;
//! - the settings notifier turns status emissions into at most one active
//!   dismissible notification.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crossviz_core::filter::{FilterState, PresetGroup, PresetGroupView};
use crossviz_services::{
    NotificationId, NotificationOptions, NotificationSink, SettingsStatus, SettingsStatusCode,
};

/// Combine-latest of the preset stream and the default-filter stream.
///
/// Publishes immediately from the current values, then republishes on
/// every change of either input until cancelled or an input closes.
pub(crate) fn spawn_preset_combiner(
    mut presets_rx: watch::Receiver<PresetGroup>,
    mut default_rx: watch::Receiver<FilterState>,
    out: watch::Sender<PresetGroupView>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let view = PresetGroupView {
                group: presets_rx.borrow_and_update().clone(),
                default: default_rx.borrow_and_update().clone(),
            };
            let _ = out.send(view);

            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = presets_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = default_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Dismiss the currently displayed notification, if any. Idempotent.
pub(crate) fn dismiss_active(
    notifier: &Arc<dyn NotificationSink>,
    active: &Mutex<Option<NotificationId>>,
) {
    if let Some(id) = active.lock().unwrap().take() {
        notifier.remove(id);
    }
}

/// Settings-status notification loop.
///
/// Every emission first dismisses the active notification; only the
/// busy code ([`SettingsStatusCode::Processing`]) then shows a new one,
/// so at most one notification is ever visible.
pub(crate) fn spawn_settings_notifier(
    mut status_rx: broadcast::Receiver<SettingsStatus>,
    notifier: Arc<dyn NotificationSink>,
    active: Arc<Mutex<Option<NotificationId>>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                result = status_rx.recv() => match result {
                    Ok(status) => {
                        dismiss_active(&notifier, &active);
                        if status.code == SettingsStatusCode::Processing {
                            let id = notifier.show(
                                &status.message,
                                NotificationOptions { tap_to_dismiss: true },
                            );
                            *active.lock().unwrap() = Some(id);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Settings status stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Settings status stream closed, notifier shutting down");
                        break;
                    }
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossviz_core::filter::{FilterPreset, FilterState};
    use crossviz_services::RecordingNotifier;

    #[tokio::test]
    async fn combiner_publishes_current_values_immediately() {
        let (presets_tx, presets_rx) = watch::channel(PresetGroup {
            presets: vec![FilterPreset {
                name: "weekly".into(),
                state: FilterState::default(),
            }],
        });
        let (_default_tx, default_rx) = watch::channel(FilterState::default());
        let (out_tx, out_rx) = watch::channel(PresetGroupView::default());
        let cancel = CancellationToken::new();

        let handle = spawn_preset_combiner(presets_rx, default_rx, out_tx, cancel.clone());
        tokio::task::yield_now().await;

        assert_eq!(out_rx.borrow().group.presets.len(), 1);

        cancel.cancel();
        handle.await.unwrap();
        drop(presets_tx);
    }

    #[tokio::test]
    async fn combiner_recombines_on_either_input() {
        let (presets_tx, presets_rx) = watch::channel(PresetGroup::default());
        let (default_tx, default_rx) = watch::channel(FilterState::default());
        let (out_tx, mut out_rx) = watch::channel(PresetGroupView::default());
        let cancel = CancellationToken::new();

        let handle = spawn_preset_combiner(presets_rx, default_rx, out_tx, cancel.clone());

        default_tx.send_modify(|state| {
            state.entity = Some(crossviz_core::filter::EntitySlice {
                ids: vec!["e1".into()],
                average: false,
            });
        });
        out_rx.changed().await.unwrap();
        // First observable change may still be the initial publish; wait
        // until the entity default shows up.
        while out_rx.borrow().default.entity.is_none() {
            out_rx.changed().await.unwrap();
        }

        presets_tx.send_modify(|group| {
            group.presets.push(FilterPreset {
                name: "weekly".into(),
                state: FilterState::default(),
            });
        });
        while out_rx.borrow().group.presets.is_empty() {
            out_rx.changed().await.unwrap();
        }

        let view = out_rx.borrow().clone();
        assert_eq!(view.group.presets.len(), 1);
        assert!(view.default.entity.is_some());

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn notifier_keeps_at_most_one_notification() {
        let (status_tx, status_rx) = broadcast::channel(8);
        let notifier = Arc::new(RecordingNotifier::default());
        let sink: Arc<dyn NotificationSink> = notifier.clone();
        let active = Arc::new(Mutex::new(None));
        let cancel = CancellationToken::new();

        let handle = spawn_settings_notifier(status_rx, sink, active.clone(), cancel.clone());

        status_tx
            .send(SettingsStatus::new(SettingsStatusCode::Processing, "saving"))
            .unwrap();
        status_tx
            .send(SettingsStatus::new(SettingsStatusCode::Processing, "still saving"))
            .unwrap();

        while notifier.shown_messages().len() < 2 {
            tokio::task::yield_now().await;
        }
        assert_eq!(notifier.active_count(), 1);

        status_tx
            .send(SettingsStatus::new(SettingsStatusCode::Ready, "done"))
            .unwrap();
        while notifier.active_count() > 0 {
            tokio::task::yield_now().await;
        }
        assert!(active.lock().unwrap().is_none());

        cancel.cancel();
        handle.await.unwrap();
    }
}
