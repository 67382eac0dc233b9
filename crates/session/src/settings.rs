//! In-memory snapshot of the persisted page settings.

use crossviz_core::entity::EntityType;
use crossviz_core::period::Period;
use crossviz_core::types::EntityId;
use crossviz_store::PersistedFilterParameters;

/// Flattened view of the stored filter parameters for the current
/// (layout, segment). Refreshed on every layout resolution and after every
/// accepted filter change; an absent or unreadable record yields the
/// all-`None` snapshot, which downstream treats as "no override".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageSettings {
    pub entities_ids: Option<Vec<EntityId>>,
    pub periods: Option<Vec<Period>>,
    pub entity_is_average: Option<bool>,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<EntityId>,
}

impl PageSettings {
    pub fn from_record(record: Option<PersistedFilterParameters>) -> Self {
        let Some(record) = record else {
            return Self::default();
        };
        let cross_visitation = record.cross_visitation.unwrap_or_default();
        Self {
            entities_ids: record.entities_ids,
            periods: record.periods,
            entity_is_average: record.entities_is_average,
            entity_type: cross_visitation.entity_type,
            entity_id: cross_visitation.entity_id,
        }
    }
}
