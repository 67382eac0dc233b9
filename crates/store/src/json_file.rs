//! JSON-file parameter store.
//!
//! One JSON object per file, keyed `"<layout_id>::<segment>"`. Loaded once
//! on open; every update rewrites the file. A missing or malformed file
//! reads as empty — stored garbage must never break the page.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crossviz_core::types::{LayoutId, PageSegment};

use crate::params::PersistedFilterParameters;
use crate::{FilterParameterStore, StoreError};

/// [`FilterParameterStore`] persisted to a single JSON file.
pub struct JsonFileParameterStore {
    path: PathBuf,
    records: Mutex<HashMap<String, PersistedFilterParameters>>,
}

fn record_key(layout_id: &LayoutId, segment: &PageSegment) -> String {
    format!("{layout_id}::{segment}")
}

impl JsonFileParameterStore {
    /// Open the store at `path`, loading any existing records. A missing
    /// or unparsable file starts the store empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let records = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Malformed parameter file, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable parameter file, starting empty");
                HashMap::new()
            }
        };
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    fn flush(&self, records: &HashMap<String, PersistedFilterParameters>) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl FilterParameterStore for JsonFileParameterStore {
    fn get_by_layout_and_page_path(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
    ) -> Option<PersistedFilterParameters> {
        self.records
            .lock()
            .unwrap()
            .get(&record_key(layout_id, segment))
            .cloned()
    }

    fn update_config_for_layout_and_page_path(
        &self,
        layout_id: &LayoutId,
        segment: &PageSegment,
        params: PersistedFilterParameters,
    ) {
        let mut records = self.records.lock().unwrap();
        records.insert(record_key(layout_id, segment), params);
        if let Err(e) = self.flush(&records) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist filter parameters");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedFilterParameters {
        PersistedFilterParameters {
            entities_ids: Some(vec!["e42".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        let layout = "mall-1".to_string();
        let segment = "cross-visitation".to_string();

        {
            let store = JsonFileParameterStore::open(&path);
            store.update_config_for_layout_and_page_path(&layout, &segment, sample());
        }

        let reopened = JsonFileParameterStore::open(&path);
        assert_eq!(
            reopened.get_by_layout_and_page_path(&layout, &segment),
            Some(sample())
        );
    }

    #[test]
    fn malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileParameterStore::open(&path);
        assert!(store
            .get_by_layout_and_page_path(&"mall-1".to_string(), &"cross-visitation".to_string())
            .is_none());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileParameterStore::open(dir.path().join("absent.json"));
        assert!(store
            .get_by_layout_and_page_path(&"mall-1".to_string(), &"cross-visitation".to_string())
            .is_none());
    }
}
