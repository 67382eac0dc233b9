//! Layout of the dashboard page: the configured display arrangement the
//! page renders against. Resolved once per upstream layout selection and
//! immutable for the page lifetime.

use serde::{Deserialize, Serialize};

use crate::types::LayoutId;

/// Placeholder title when the upstream layout carries none.
pub const NO_NAME: &str = "n/a";

/// The page-layout kind of a [`Layout`].
///
/// The lead-entity-type classification over these views is supplied by the
/// entities service, not derived here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutView {
    Mall,
    ShoppingCenter,
    Outlet,
    Street,
}

/// A resolved page layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: LayoutId,
    pub view: LayoutView,
    pub title: String,
}

impl Layout {
    /// Build a layout snapshot, substituting [`NO_NAME`] for an absent title.
    pub fn new(id: impl Into<LayoutId>, view: LayoutView, title: Option<String>) -> Self {
        Self {
            id: id.into(),
            view,
            title: title.unwrap_or_else(|| NO_NAME.to_string()),
        }
    }
}
