//! Synchronous translation lookup.

use std::collections::HashMap;

/// Localized string lookup. Synchronous: the translation table is already
/// loaded by the time the page runs.
pub trait TranslateService: Send + Sync {
    fn get(&self, key: &str) -> String;
}

/// Table-backed [`TranslateService`]. Unknown keys fall back to the key
/// itself, the usual i18n behavior.
#[derive(Default)]
pub struct StaticTranslations {
    table: HashMap<String, String>,
}

impl StaticTranslations {
    pub fn new(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.table.insert(key.into(), value.into());
        self
    }
}

impl TranslateService for StaticTranslations {
    fn get(&self, key: &str) -> String {
        self.table.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve_and_unknown_fall_back() {
        let translations = StaticTranslations::default()
            .with("crossVisitationPage.filter.entityType.Tenant", "Арендатор");

        assert_eq!(
            translations.get("crossVisitationPage.filter.entityType.Tenant"),
            "Арендатор"
        );
        assert_eq!(translations.get("missing.key"), "missing.key");
    }
}
