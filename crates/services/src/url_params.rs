//! One-time URL parameter ingestion.
//!
//! Deep links into the page may carry an entity id, a period list and an
//! entity type; the session writes them through to the parameter store on
//! first load when all three are present.

use std::collections::HashMap;

use crossviz_core::period::Period;
use crossviz_core::types::EntityId;

/// URL key of the entity-type override.
pub const URL_KEY_ENTITY_TYPE: &str = "entityType";

/// Read access to the current URL's query parameters.
pub trait UrlParamService: Send + Sync {
    fn entity_id(&self) -> Option<EntityId>;

    /// Parsed period list; empty when the URL carries none.
    fn period_list(&self) -> Vec<Period>;

    /// Raw string lookup for any other key.
    fn get(&self, key: &str) -> Option<String>;
}

/// Fixed parameter set, standing in for a parsed URL.
#[derive(Default)]
pub struct StaticUrlParams {
    pub entity_id: Option<EntityId>,
    pub periods: Vec<Period>,
    pub extra: HashMap<String, String>,
}

impl StaticUrlParams {
    /// A URL with no recognized parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A deep link carrying the full override triple.
    pub fn deep_link(entity_id: impl Into<EntityId>, periods: Vec<Period>, entity_type: &str) -> Self {
        Self {
            entity_id: Some(entity_id.into()),
            periods,
            extra: HashMap::from([(URL_KEY_ENTITY_TYPE.to_string(), entity_type.to_string())]),
        }
    }
}

impl UrlParamService for StaticUrlParams {
    fn entity_id(&self) -> Option<EntityId> {
        self.entity_id.clone()
    }

    fn period_list(&self) -> Vec<Period> {
        self.periods.clone()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.extra.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn deep_link_exposes_all_three_parameters() {
        let period = Period::default_window(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        let params = StaticUrlParams::deep_link("e42", vec![period], "Zone");

        assert_eq!(params.entity_id().as_deref(), Some("e42"));
        assert_eq!(params.period_list().len(), 1);
        assert_eq!(params.get(URL_KEY_ENTITY_TYPE).as_deref(), Some("Zone"));
        assert!(params.get("other").is_none());
    }

    #[test]
    fn empty_url_has_no_parameters() {
        let params = StaticUrlParams::empty();
        assert!(params.entity_id().is_none());
        assert!(params.period_list().is_empty());
    }
}
