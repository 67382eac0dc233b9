//! Retail entities and the relations between them.
//!
//! Entities are fetched per layout and period; a new fetch fully replaces
//! the set. Relations only feed the external entity-finder index and carry
//! no structural invariants beyond valid endpoint ids.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Entity types eligible for entity-selection filtering.
pub const FILTERABLE_TYPES: &[EntityType] = &[EntityType::Tenant, EntityType::Zone];

/// Entity types offered as cross-visitation counterparts.
pub const CROSS_VISITATION_TARGET_TYPES: &[EntityType] = &[EntityType::Zone, EntityType::Floor];

/// Closed enumeration of retail entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Tenant,
    Zone,
    Floor,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Tenant => "Tenant",
            EntityType::Zone => "Zone",
            EntityType::Floor => "Floor",
        }
    }

    /// Lookup key for the localized type title.
    pub fn translate_key(&self) -> String {
        format!("crossVisitationPage.filter.entityType.{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tenant" => Ok(EntityType::Tenant),
            "Zone" => Ok(EntityType::Zone),
            "Floor" => Ok(EntityType::Floor),
            _ => Err(()),
        }
    }
}

/// A retail entity as fetched for the active layout and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub name: String,
}

/// An edge between two entities, consumed only by the entity-finder index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub from_id: EntityId,
    pub to_id: EntityId,
}

/// Filter-ready projection of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEntity {
    pub id: EntityId,
    pub name: String,
}

/// Intersect fetched entities with the id allow-list.
///
/// Order follows the fetched sequence; entities absent from the mapping are
/// dropped and duplicate ids are collapsed to their first occurrence.
pub fn intersect_with_mapping(entities: Vec<Entity>, mapping: &[EntityId]) -> Vec<Entity> {
    let allowed: HashSet<&EntityId> = mapping.iter().collect();
    let mut seen: HashSet<EntityId> = HashSet::new();
    entities
        .into_iter()
        .filter(|entity| allowed.contains(&entity.id) && seen.insert(entity.id.clone()))
        .collect()
}

/// Entities restricted to the given types, fetch order preserved.
pub fn filter_by_types(entities: &[Entity], types: &[EntityType]) -> Vec<Entity> {
    entities
        .iter()
        .filter(|entity| types.contains(&entity.entity_type))
        .cloned()
        .collect()
}

/// Project entities into the filter-ready list shape.
pub fn to_filter_entities(entities: &[Entity]) -> Vec<FilterEntity> {
    entities
        .iter()
        .map(|entity| FilterEntity {
            id: entity.id.clone(),
            name: entity.name.clone(),
        })
        .collect()
}
