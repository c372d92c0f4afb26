//! The persisted conversation language pair.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::language::{Language, LanguagePreference};
use crate::storage::{load_json, save_json, KeyValueStore};

const FIRST_KEY: &str = "firstLanguage";
const SECOND_KEY: &str = "secondLanguage";

/// Stored shape of one side of the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredLanguage {
    code: String,
    name: String,
}

impl From<&Language> for StoredLanguage {
    fn from(lang: &Language) -> Self {
        Self {
            code: lang.code.clone(),
            name: lang.name.clone(),
        }
    }
}

impl From<StoredLanguage> for Language {
    fn from(stored: StoredLanguage) -> Self {
        Language::new(stored.code, stored.name)
    }
}

pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored pair, present only when both sides are.
    pub fn load(&self) -> Option<LanguagePreference> {
        let first: StoredLanguage = load_json(self.store.as_ref(), FIRST_KEY)?;
        let second: StoredLanguage = load_json(self.store.as_ref(), SECOND_KEY)?;
        Some(LanguagePreference {
            first: first.into(),
            second: second.into(),
        })
    }

    pub fn save(&self, preference: &LanguagePreference) -> Result<(), StoreError> {
        save_json(
            self.store.as_ref(),
            FIRST_KEY,
            &StoredLanguage::from(&preference.first),
        )?;
        save_json(
            self.store.as_ref(),
            SECOND_KEY,
            &StoredLanguage::from(&preference.second),
        )
    }

    /// Stored pair if any, else defaults derived from `available`. The result
    /// is written back so later loads see the same pair.
    pub fn resolve(&self, available: &[Language]) -> Option<LanguagePreference> {
        let resolved = self.load().or_else(|| default_preference(available))?;

        if let Err(e) = self.save(&resolved) {
            log::warn!("Failed to persist language preference: {e}");
        }
        Some(resolved)
    }
}

/// First two available languages, or the only one on both sides.
pub fn default_preference(available: &[Language]) -> Option<LanguagePreference> {
    let first = available.first()?.clone();
    let second = available.get(1).cloned().unwrap_or_else(|| first.clone());
    Some(LanguagePreference { first, second })
}
