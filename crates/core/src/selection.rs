//! Selection normalization: deriving the authoritative selected entities,
//! selected entity type and filtering entity from the current entity set
//! plus persisted or URL overrides.
//!
//! All functions are pure. Precedence rules, fallbacks and the silent-drop
//! policy for stale references live here; the session crate only wires
//! their inputs and outputs.

use crate::entity::{self, Entity, EntityType, FilterEntity, CROSS_VISITATION_TARGET_TYPES, FILTERABLE_TYPES};
use crate::filter::EntityTypeOption;
use crate::types::EntityId;

/// Derive the selected entities.
///
/// Precedence: persisted ids, then the ids already selected in memory.
/// Each id is resolved against `required`; ids with no match are dropped
/// silently. An empty result falls back to the first
/// `min(max_count, required.len())` entities in fetch order, so the
/// selection is never empty unless `required` itself is.
pub fn resolve_selected_entities(
    persisted_ids: Option<&[EntityId]>,
    in_memory_ids: &[EntityId],
    required: &[Entity],
    max_count: usize,
) -> Vec<Entity> {
    let candidate_ids: &[EntityId] = persisted_ids.unwrap_or(in_memory_ids);

    let resolved: Vec<Entity> = candidate_ids
        .iter()
        .filter_map(|id| required.iter().find(|entity| &entity.id == id))
        .cloned()
        .collect();

    if resolved.is_empty() {
        required.iter().take(max_count).cloned().collect()
    } else {
        resolved
    }
}

/// Derive the selected cross-visitation entity type.
///
/// An entity matching `previous` wins over one matching `lead`; a
/// persisted type then overrides the computed value unconditionally.
/// With no persisted type and no matching entity the result is `None`.
pub fn resolve_selected_entity_type(
    entities: &[Entity],
    previous: Option<EntityType>,
    lead: Option<EntityType>,
    persisted: Option<EntityType>,
) -> Option<EntityType> {
    let matched = entities
        .iter()
        .find(|entity| Some(entity.entity_type) == previous)
        .or_else(|| entities.iter().find(|entity| Some(entity.entity_type) == lead));

    if persisted.is_some() {
        persisted
    } else {
        matched.map(|entity| entity.entity_type)
    }
}

/// Derive the cross-visitation filtering entity.
///
/// A persisted id overrides the in-memory id; the winning id is resolved
/// against the current entity set. Resolution failure yields
/// `(None, None)` — stale ids are dropped silently, never surfaced as an
/// error.
pub fn resolve_filtering_entity(
    persisted_id: Option<&EntityId>,
    in_memory_id: Option<&EntityId>,
    entities: &[Entity],
) -> (Option<EntityId>, Option<Entity>) {
    let candidate = persisted_id.or(in_memory_id);
    match candidate {
        Some(id) => match entities.iter().find(|entity| &entity.id == id) {
            Some(entity) => (Some(entity.id.clone()), Some(entity.clone())),
            None => (None, None),
        },
        None => (None, None),
    }
}

/// One-way latch for the average-entities flag: only a persisted `true`
/// updates the value, otherwise the in-memory value is retained.
pub fn latch_average(current: bool, persisted: Option<bool>) -> bool {
    if persisted == Some(true) {
        true
    } else {
        current
    }
}

/// The entity-type options of the cross-visitation filter: the filterable
/// types, in their fixed order, restricted to the types actually present
/// among `entities`. `name_for` supplies the localized display name.
pub fn entity_type_options(
    entities: &[Entity],
    name_for: impl Fn(EntityType) -> String,
) -> Vec<EntityTypeOption> {
    FILTERABLE_TYPES
        .iter()
        .filter(|t| entities.iter().any(|entity| entity.entity_type == **t))
        .map(|t| EntityTypeOption {
            key: *t,
            name: name_for(*t),
        })
        .collect()
}

/// Entities offered as cross-visitation counterparts (zones and floors),
/// projected to the filter-ready shape.
pub fn cross_visitation_candidates(entities: &[Entity]) -> Vec<FilterEntity> {
    entity::to_filter_entities(&entity::filter_by_types(entities, CROSS_VISITATION_TARGET_TYPES))
}
