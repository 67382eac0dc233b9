//! Entity, mapping and relation retrieval for the active layout and
//! period, plus the lead-entity-type classification and the external
//! entity-finder index hook.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crossviz_core::entity::{Entity, EntityType, Relation};
use crossviz_core::layout::LayoutView;
use crossviz_core::types::{EntityId, LayoutId};

use crate::error::ServiceError;

/// Retrieval of entities, the id allow-list ("shopster mapping") and
/// relations, all scoped to a layout and a `%Y-%m-%d` date range.
#[async_trait]
pub trait EntitiesService: Send + Sync {
    async fn get_entities(
        &self,
        layout_id: &LayoutId,
        from: &str,
        to: &str,
    ) -> Result<Vec<Entity>, ServiceError>;

    async fn get_shopster_mapping(&self, layout_id: &LayoutId)
        -> Result<Vec<EntityId>, ServiceError>;

    async fn get_relations(
        &self,
        layout_id: &LayoutId,
        from: &str,
        to: &str,
    ) -> Result<Vec<Relation>, ServiceError>;

    /// The lead entity type is a pure function of the layout view; it never
    /// depends on fetched entities.
    fn lead_entity_type(&self, view: LayoutView) -> EntityType;

    /// Fire-and-forget push of a fresh entity/relation set into the
    /// external entity-finder index.
    fn init_entity_finder_store(&self, entities: &[Entity], relations: &[Relation]);
}

/// Canned in-memory [`EntitiesService`].
///
/// Serves fixed entity/mapping/relation sets, classifies street layouts as
/// zone-led and everything else as tenant-led, and records every
/// finder-store initialization so tests can assert on re-trigger rules.
/// Either fetch group can be switched into failure mode independently.
#[derive(Default)]
pub struct StaticEntitiesService {
    pub entities: Vec<Entity>,
    pub mapping: Vec<EntityId>,
    pub relations: Vec<Relation>,
    fail_entities: AtomicBool,
    fail_relations: AtomicBool,
    finder_inits: Mutex<Vec<(usize, usize)>>,
}

impl StaticEntitiesService {
    pub fn new(entities: Vec<Entity>, mapping: Vec<EntityId>, relations: Vec<Relation>) -> Self {
        Self {
            entities,
            mapping,
            relations,
            ..Default::default()
        }
    }

    /// Make subsequent entity/mapping requests fail.
    pub fn set_fail_entities(&self, fail: bool) {
        self.fail_entities.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent relation requests fail.
    pub fn set_fail_relations(&self, fail: bool) {
        self.fail_relations.store(fail, Ordering::SeqCst);
    }

    /// (entity count, relation count) of every finder-store init so far.
    pub fn finder_inits(&self) -> Vec<(usize, usize)> {
        self.finder_inits.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntitiesService for StaticEntitiesService {
    async fn get_entities(
        &self,
        layout_id: &LayoutId,
        _from: &str,
        _to: &str,
    ) -> Result<Vec<Entity>, ServiceError> {
        if self.fail_entities.load(Ordering::SeqCst) {
            return Err(ServiceError::Backend(format!(
                "entities request failed for layout {layout_id}"
            )));
        }
        Ok(self.entities.clone())
    }

    async fn get_shopster_mapping(
        &self,
        layout_id: &LayoutId,
    ) -> Result<Vec<EntityId>, ServiceError> {
        if self.fail_entities.load(Ordering::SeqCst) {
            return Err(ServiceError::Backend(format!(
                "mapping request failed for layout {layout_id}"
            )));
        }
        Ok(self.mapping.clone())
    }

    async fn get_relations(
        &self,
        layout_id: &LayoutId,
        _from: &str,
        _to: &str,
    ) -> Result<Vec<Relation>, ServiceError> {
        if self.fail_relations.load(Ordering::SeqCst) {
            return Err(ServiceError::Backend(format!(
                "relations request failed for layout {layout_id}"
            )));
        }
        Ok(self.relations.clone())
    }

    fn lead_entity_type(&self, view: LayoutView) -> EntityType {
        match view {
            LayoutView::Street => EntityType::Zone,
            LayoutView::Mall | LayoutView::ShoppingCenter | LayoutView::Outlet => {
                EntityType::Tenant
            }
        }
    }

    fn init_entity_finder_store(&self, entities: &[Entity], relations: &[Relation]) {
        tracing::debug!(
            entities = entities.len(),
            relations = relations.len(),
            "Entity finder store initialized"
        );
        self.finder_inits
            .lock()
            .unwrap()
            .push((entities.len(), relations.len()));
    }
}
