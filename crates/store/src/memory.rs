//! In-memory parameter store.

use std::collections::HashMap;
use std::sync::RwLock;

use crossviz_core::types::{LayoutId, PageSegment};

use crate::params::PersistedFilterParameters;
use crate::FilterParameterStore;

/// [`FilterParameterStore`] held entirely in memory. The default store for
/// tests and the demo binary.
#[derive(Default)]
pub struct MemoryParameterStore {
    records: RwLock<HashMap<(LayoutId, PageSegment), PersistedFilterParameters>>,
}

impl FilterParameterStore for MemoryParameterStore {
    fn get_by_layout_and_page_path(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
    ) -> Option<PersistedFilterParameters> {
        self.records
            .read()
            .unwrap()
            .get(&(layout_id.clone(), segment.clone()))
            .cloned()
    }

    fn update_config_for_layout_and_page_path(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
        params: PersistedFilterParameters,
    ) {
        self.records
            .write()
            .unwrap()
            .insert((layout_id.clone(), segment.clone()), params);
    }
}
