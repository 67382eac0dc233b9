//! Named filter presets stored per (layout, page segment).
//!
//! The preset group is exposed as a latest-value stream so the page can
//! recombine it with the default filter state whenever either side moves.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::watch;

use crossviz_core::filter::{PresetAction, PresetGroup};
use crossviz_core::types::{LayoutId, PageSegment};

/// Preset storage and mutation for the page filter.
pub trait FilterSettingsService: Send + Sync {
    /// Latest-value stream of the preset group for (layout, segment).
    fn filter_presets(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
    ) -> watch::Receiver<PresetGroup>;

    /// Apply a user-issued preset operation for (layout, segment).
    fn handle_preset_action(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
        action: PresetAction,
    );
}

/// In-memory [`FilterSettingsService`] backed by one watch channel per
/// (layout, segment) key.
#[derive(Default)]
pub struct InMemoryFilterSettings {
    channels: Mutex<HashMap<(LayoutId, PageSegment), watch::Sender<PresetGroup>>>,
}

impl InMemoryFilterSettings {
    fn sender(&self, layout_id: &LayoutId, segment: &PageSegment) -> watch::Sender<PresetGroup> {
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry((layout_id.clone(), segment.clone()))
            .or_insert_with(|| watch::channel(PresetGroup::default()).0)
            .clone()
    }

    /// Replace the stored group outright, notifying subscribers.
    pub fn publish(&self, layout_id: &LayoutId, segment: &PageSegment, group: PresetGroup) {
        let _ = self.sender(layout_id, segment).send(group);
    }
}

impl FilterSettingsService for InMemoryFilterSettings {
    fn filter_presets(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
    ) -> watch::Receiver<PresetGroup> {
        self.sender(layout_id, segment).subscribe()
    }

    fn handle_preset_action(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
        action: PresetAction,
    ) {
        let sender = self.sender(layout_id, segment);
        sender.send_modify(|group| match action {
            PresetAction::Save(preset) => {
                match group.presets.iter_mut().find(|p| p.name == preset.name) {
                    Some(existing) => *existing = preset,
                    None => group.presets.push(preset),
                }
            }
            PresetAction::Delete(name) => {
                group.presets.retain(|p| p.name != name);
            }
            PresetAction::Rename { from, to } => {
                if let Some(preset) = group.presets.iter_mut().find(|p| p.name == from) {
                    preset.name = to;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossviz_core::filter::{FilterPreset, FilterState};

    fn preset(name: &str) -> FilterPreset {
        FilterPreset {
            name: name.to_string(),
            state: FilterState::default(),
        }
    }

    #[test]
    fn save_inserts_then_replaces_by_name() {
        let service = InMemoryFilterSettings::default();
        let layout = "mall-1".to_string();
        let segment = "cross-visitation".to_string();
        let rx = service.filter_presets(&layout, &segment);

        service.handle_preset_action(&layout, &segment, PresetAction::Save(preset("weekly")));
        service.handle_preset_action(&layout, &segment, PresetAction::Save(preset("weekly")));

        assert_eq!(rx.borrow().presets.len(), 1);
    }

    #[test]
    fn delete_and_rename_touch_only_the_named_preset() {
        let service = InMemoryFilterSettings::default();
        let layout = "mall-1".to_string();
        let segment = "cross-visitation".to_string();
        service.handle_preset_action(&layout, &segment, PresetAction::Save(preset("a")));
        service.handle_preset_action(&layout, &segment, PresetAction::Save(preset("b")));

        service.handle_preset_action(
            &layout,
            &segment,
            PresetAction::Rename { from: "a".into(), to: "c".into() },
        );
        service.handle_preset_action(&layout, &segment, PresetAction::Delete("b".into()));

        let rx = service.filter_presets(&layout, &segment);
        let names: Vec<String> = rx.borrow().presets.iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn streams_are_scoped_per_layout_and_segment() {
        let service = InMemoryFilterSettings::default();
        let segment = "cross-visitation".to_string();
        service.handle_preset_action(&"mall-1".to_string(), &segment, PresetAction::Save(preset("a")));

        let other = service.filter_presets(&"mall-2".to_string(), &segment);
        assert!(other.borrow().presets.is_empty());
    }
}
