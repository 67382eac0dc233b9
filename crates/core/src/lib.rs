//! Domain model and pure synchronous logic for the cross-visitation
//! dashboard filter session.
//!
//! Everything in this crate is I/O-free: types, validation, the
//! key-scoped default-filter fold ([`FilterState::apply`]) and the
//! selection-normalization functions in [`selection`]. Network and
//! storage concerns live in `crossviz-services` and `crossviz-store`;
//! orchestration lives in `crossviz-session`.

pub mod entity;
pub mod error;
pub mod filter;
pub mod layout;
pub mod period;
pub mod selection;
pub mod types;

pub use entity::{Entity, EntityType, FilterEntity, Relation};
pub use error::CoreError;
pub use filter::{FilterConfig, FilterPatch, FilterState, PresetGroup, PresetGroupView};
pub use layout::{Layout, LayoutView};
pub use period::Period;
