//! The default-filter accumulator: a latest-value stream built by
//! left-folding partial patches.
//!
//! Patches arrive at well-defined points of the session lifecycle — the
//! empty seed at construction, the default week window on every period
//! update, the entity and cross-visitation defaults on every successful
//! entity fetch — and each one replaces only the top-level keys it
//! carries ([`FilterState::apply`]).

use tokio::sync::watch;

use crossviz_core::filter::{FilterPatch, FilterState};

/// Watch-backed fold of [`FilterPatch`]es into the current default filter
/// state.
pub struct DefaultFilterAccumulator {
    sender: watch::Sender<FilterState>,
}

impl DefaultFilterAccumulator {
    /// Seed with the empty state.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(FilterState::default());
        Self { sender }
    }

    /// Fold one patch into the accumulated state and notify subscribers.
    pub fn push(&self, patch: FilterPatch) {
        self.sender.send_modify(|state| state.apply(patch));
    }

    /// Subscribe to the accumulated stream; the receiver always observes
    /// the latest fold.
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.sender.subscribe()
    }

    /// The current accumulated state.
    pub fn latest(&self) -> FilterState {
        self.sender.borrow().clone()
    }
}

impl Default for DefaultFilterAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crossviz_core::filter::EntitySlice;
    use crossviz_core::period::Period;

    fn periods_patch(day: u32) -> FilterPatch {
        FilterPatch {
            periods: Some(vec![Period::default_window(
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            )]),
            ..Default::default()
        }
    }

    #[test]
    fn starts_from_the_empty_seed() {
        let accumulator = DefaultFilterAccumulator::new();
        assert_eq!(accumulator.latest(), FilterState::default());
    }

    #[test]
    fn later_patches_replace_only_their_key() {
        let accumulator = DefaultFilterAccumulator::new();
        accumulator.push(periods_patch(10));
        accumulator.push(FilterPatch {
            entity: Some(EntitySlice {
                ids: vec!["e1".into()],
                average: false,
            }),
            ..Default::default()
        });
        accumulator.push(periods_patch(17));

        let state = accumulator.latest();
        assert_eq!(
            state.periods.as_ref().unwrap()[0].to,
            NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
        );
        assert_eq!(state.entity.as_ref().unwrap().ids, vec!["e1".to_string()]);
    }

    #[tokio::test]
    async fn subscribers_observe_the_latest_fold() {
        let accumulator = DefaultFilterAccumulator::new();
        let mut rx = accumulator.subscribe();

        accumulator.push(periods_patch(10));
        rx.changed().await.unwrap();
        assert!(rx.borrow().periods.is_some());
    }
}
