//! Filter state, the key-scoped default-state fold, filter configuration
//! and preset types.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityType, FilterEntity};
use crate::error::CoreError;
use crate::period::Period;
use crate::types::EntityId;

/// The `entity` slice of a filter state or patch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntitySlice {
    pub ids: Vec<EntityId>,
    pub average: bool,
}

/// The `cross_visitation` slice of a filter state or patch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossVisitationSlice {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<EntityId>,
    pub entity_type_title: Option<String>,
    pub entity_title: Option<String>,
}

/// Accumulated displayable filter state.
///
/// Built by left-folding [`FilterPatch`]es: each top-level key present in a
/// patch fully replaces the corresponding slice, absent keys are left
/// untouched. See [`FilterState::apply`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<Period>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntitySlice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_visitation: Option<CrossVisitationSlice>,
}

/// A partial filter update. Same shape as [`FilterState`]; a key that is
/// `None` means "leave that slice alone".
pub type FilterPatch = FilterState;

impl FilterState {
    /// Fold one patch into the accumulated state, key-scoped: a present
    /// key replaces its slice wholesale, an absent key preserves the
    /// previously accumulated slice.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(periods) = patch.periods {
            self.periods = Some(periods);
        }
        if let Some(entity) = patch.entity {
            self.entity = Some(entity);
        }
        if let Some(cross_visitation) = patch.cross_visitation {
            self.cross_visitation = Some(cross_visitation);
        }
    }

    /// `apply` in builder form.
    pub fn applied(mut self, patch: FilterPatch) -> Self {
        self.apply(patch);
        self
    }
}

/// Which filter elements the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterElement {
    Period,
    Entity,
}

/// Dropdown sizing for the filter forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropdownSize {
    Small,
    Large,
}

/// Static configuration of the page filter.
///
/// Replaces the implicit default-parameter object of the upstream filter
/// component with enumerated fields and documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Upper bound on simultaneously selected entities. Default 5.
    pub max_selected_entity_count: usize,
    /// Hide the filter reset button. Default true.
    pub hide_reset_button: bool,
    /// Hide the entity-average toggle. Default true.
    pub hide_entity_average: bool,
    /// Hide the compare-period-average toggle. Default true.
    pub hide_compare_period_average: bool,
    /// Filter elements shown on the page. Default `[Period, Entity]`.
    pub elements: Vec<FilterElement>,
    /// Upper bound on selectable periods. Default 1.
    pub max_periods_count: usize,
    /// Dropdown size of the main-period form. Default `Small`.
    pub main_period_dropdown: DropdownSize,
    /// Dropdown size of the entity-filter form. Default `Large`.
    pub entity_filter_dropdown: DropdownSize,
    /// Lead entity type of the resolved layout, filled in on layout
    /// resolution. Default `None`.
    pub lead_entity_type: Option<EntityType>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_selected_entity_count: 5,
            hide_reset_button: true,
            hide_entity_average: true,
            hide_compare_period_average: true,
            elements: vec![FilterElement::Period, FilterElement::Entity],
            max_periods_count: 1,
            main_period_dropdown: DropdownSize::Small,
            entity_filter_dropdown: DropdownSize::Large,
            lead_entity_type: None,
        }
    }
}

impl FilterConfig {
    /// Validate the count bounds.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_selected_entity_count < 1 {
            return Err(CoreError::Validation(
                "max_selected_entity_count must be at least 1".to_string(),
            ));
        }
        if self.max_periods_count < 1 {
            return Err(CoreError::Validation(
                "max_periods_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A named, reusable saved filter configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterPreset {
    pub name: String,
    pub state: FilterState,
}

/// The named presets stored for a (layout, page) pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresetGroup {
    pub presets: Vec<FilterPreset>,
}

/// Preset group combined with the latest default filter state, the shape
/// the filter UI consumes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresetGroupView {
    pub group: PresetGroup,
    pub default: FilterState,
}

/// A user-issued preset operation, forwarded verbatim to the settings
/// service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresetAction {
    Save(FilterPreset),
    Delete(String),
    Rename { from: String, to: String },
}

/// The displayable entity-selection block of the filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntitySelectionView {
    pub average: bool,
    pub selected: Vec<EntityId>,
    pub list: Vec<FilterEntity>,
}

/// One selectable entity-type option of the cross-visitation filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeOption {
    pub key: EntityType,
    pub name: String,
}

/// The displayable cross-visitation block of the filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossVisitationFilterView {
    pub entities: Vec<FilterEntity>,
    pub entity_types: Vec<EntityTypeOption>,
    pub selected_type: Option<EntityType>,
    pub selected_id: Option<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn periods_patch(day: u32) -> FilterPatch {
        FilterPatch {
            periods: Some(vec![Period::default_window(
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            )]),
            ..Default::default()
        }
    }

    #[test]
    fn fold_accumulates_independent_keys() {
        let entity_patch = FilterPatch {
            entity: Some(EntitySlice {
                ids: vec!["e1".into()],
                average: false,
            }),
            ..Default::default()
        };

        let state = FilterState::default()
            .applied(periods_patch(10))
            .applied(entity_patch.clone());

        assert!(state.periods.is_some());
        assert_eq!(state.entity, entity_patch.entity);
    }

    #[test]
    fn fold_replaces_only_the_patched_key() {
        let entity = EntitySlice {
            ids: vec!["e1".into()],
            average: true,
        };
        let mut state = FilterState::default().applied(periods_patch(10)).applied(FilterPatch {
            entity: Some(entity.clone()),
            ..Default::default()
        });

        state.apply(periods_patch(17));

        assert_eq!(
            state.periods.as_ref().unwrap()[0].to,
            NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
        );
        assert_eq!(state.entity, Some(entity));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let state = FilterState::default().applied(periods_patch(10));
        let folded = state.clone().applied(FilterPatch::default());
        assert_eq!(folded, state);
    }

    #[test]
    fn config_defaults_match_documented_values() {
        let config = FilterConfig::default();
        assert_eq!(config.max_selected_entity_count, 5);
        assert_eq!(config.max_periods_count, 1);
        assert!(config.hide_reset_button);
        assert_eq!(config.elements, vec![FilterElement::Period, FilterElement::Entity]);
        assert_eq!(config.main_period_dropdown, DropdownSize::Small);
        assert_eq!(config.entity_filter_dropdown, DropdownSize::Large);
        assert!(config.lead_entity_type.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_counts() {
        let config = FilterConfig {
            max_selected_entity_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FilterConfig {
            max_periods_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
