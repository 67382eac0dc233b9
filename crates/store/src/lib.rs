//! Durable storage of the user's last-chosen filter parameters, keyed by
//! (layout id, page segment).
//!
//! The session writes the full parameter record on every accepted filter
//! change and reads it back on every layout resolution. Malformed or
//! absent stored data is treated as "no override" — the read path never
//! fails, it only returns `None`.

pub mod json_file;
pub mod memory;
pub mod params;

pub use json_file::JsonFileParameterStore;
pub use memory::MemoryParameterStore;
pub use params::{PersistedCrossVisitation, PersistedFilterParameters};

use crossviz_core::types::{LayoutId, PageSegment};

/// Read/write access to persisted filter parameters.
pub trait FilterParameterStore: Send + Sync {
    /// The stored record for (layout, segment), or `None` when absent or
    /// unreadable.
    fn get_by_layout_and_page_path(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
    ) -> Option<PersistedFilterParameters>;

    /// Overwrite the full record for (layout, segment). Write failures are
    /// absorbed and logged; the store is a non-transactional endpoint.
    fn update_config_for_layout_and_page_path(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
        params: PersistedFilterParameters,
    );
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
