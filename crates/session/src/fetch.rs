//! The domain data fetcher: concurrent retrieval of entities, the id
//! allow-list and relations for the active layout and main period.

use std::sync::Arc;

use crossviz_core::entity::{self, Entity, Relation};
use crossviz_core::period::Period;
use crossviz_core::types::LayoutId;
use crossviz_services::EntitiesService;

/// Result of one fetch cycle.
///
/// The two groups fail independently: `entities` is `Some` only when both
/// the entity and mapping requests succeeded (already intersected),
/// `relations` only when the relation request succeeded.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub entities: Option<Vec<Entity>>,
    pub relations: Option<Vec<Relation>>,
}

impl FetchOutcome {
    /// Both groups completed; the joined "entities+relations ready"
    /// reaction may fire.
    pub fn is_complete(&self) -> bool {
        self.entities.is_some() && self.relations.is_some()
    }
}

/// Run one fetch cycle for (layout, main period).
///
/// Group A (entities + mapping) and group B (relations) run concurrently;
/// the main period's bounds are formatted `%Y-%m-%d` at this boundary.
/// A cycle superseded by a newer period change is not cancelled — the
/// shared fields the caller writes the outcome into are last-writer-wins.
pub async fn run_fetch_cycle(
    service: &Arc<dyn EntitiesService>,
    layout_id: &LayoutId,
    main_period: &Period,
) -> FetchOutcome {
    let (from, to) = main_period.format_bounds();

    let entities_group = async {
        tokio::try_join!(
            service.get_entities(layout_id, &from, &to),
            service.get_shopster_mapping(layout_id),
        )
    };
    let relations_group = service.get_relations(layout_id, &from, &to);

    let (entities_result, relations_result) = tokio::join!(entities_group, relations_group);

    let entities = match entities_result {
        Ok((fetched, mapping)) => Some(entity::intersect_with_mapping(fetched, &mapping)),
        Err(e) => {
            tracing::warn!(%layout_id, error = %e, "Entity fetch failed");
            None
        }
    };

    let relations = match relations_result {
        Ok(relations) => Some(relations),
        Err(e) => {
            tracing::warn!(%layout_id, error = %e, "Relation fetch failed");
            None
        }
    };

    FetchOutcome { entities, relations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crossviz_core::entity::EntityType;
    use crossviz_services::StaticEntitiesService;

    fn entity(id: &str, entity_type: EntityType) -> Entity {
        Entity {
            id: id.to_string(),
            entity_type,
            name: format!("Entity {id}"),
        }
    }

    fn main_period() -> Period {
        Period::default_window(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    }

    fn service_with(
        entities: Vec<Entity>,
        mapping: Vec<String>,
    ) -> Arc<dyn EntitiesService> {
        Arc::new(StaticEntitiesService::new(entities, mapping, Vec::new()))
    }

    #[tokio::test]
    async fn successful_cycle_intersects_entities_with_mapping() {
        let service = service_with(
            vec![entity("a", EntityType::Tenant), entity("b", EntityType::Zone)],
            vec!["b".to_string()],
        );

        let outcome = run_fetch_cycle(&service, &"mall-1".to_string(), &main_period()).await;
        assert!(outcome.is_complete());
        let entities = outcome.entities.unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, "b");
    }

    #[tokio::test]
    async fn entity_failure_leaves_relations_intact() {
        let service = StaticEntitiesService::new(
            vec![entity("a", EntityType::Tenant)],
            vec!["a".to_string()],
            vec![Relation { from_id: "a".into(), to_id: "b".into() }],
        );
        service.set_fail_entities(true);
        let service: Arc<dyn EntitiesService> = Arc::new(service);

        let outcome = run_fetch_cycle(&service, &"mall-1".to_string(), &main_period()).await;
        assert!(outcome.entities.is_none());
        assert_eq!(outcome.relations.unwrap().len(), 1);
        assert!(!FetchOutcome::is_complete(&run_fetch_cycle(&service, &"mall-1".to_string(), &main_period()).await));
    }

    #[tokio::test]
    async fn relation_failure_leaves_entities_intact() {
        let service = StaticEntitiesService::new(
            vec![entity("a", EntityType::Tenant)],
            vec!["a".to_string()],
            Vec::new(),
        );
        service.set_fail_relations(true);
        let service: Arc<dyn EntitiesService> = Arc::new(service);

        let outcome = run_fetch_cycle(&service, &"mall-1".to_string(), &main_period()).await;
        assert!(outcome.entities.is_some());
        assert!(outcome.relations.is_none());
        assert!(!outcome.is_complete());
    }
}
