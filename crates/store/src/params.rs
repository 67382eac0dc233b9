//! The persisted filter parameter record.

use serde::{Deserialize, Serialize};

use crossviz_core::entity::EntityType;
use crossviz_core::period::Period;
use crossviz_core::types::EntityId;

/// Persisted cross-visitation selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedCrossVisitation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
}

/// The durable filter parameter record for one (layout, page) pair.
///
/// Every field is optional: older records and URL-bootstrap writes carry
/// only a subset, and absent fields mean "no override".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedFilterParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities_ids: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<Period>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities_is_average: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_visitation: Option<PersistedCrossVisitation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_as_none() {
        let record: PersistedFilterParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(record, PersistedFilterParameters::default());
    }

    #[test]
    fn partial_record_round_trips() {
        let record = PersistedFilterParameters {
            entities_ids: Some(vec!["e42".into()]),
            cross_visitation: Some(PersistedCrossVisitation {
                entity_type: Some(EntityType::Zone),
                entity_id: None,
            }),
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: PersistedFilterParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.periods.is_none());
    }
}
