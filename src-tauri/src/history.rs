//! Persisted log of translation exchanges, most recent first.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::StoreError;
use crate::settings::Settings;
use crate::storage::{load_json, save_json, KeyValueStore};

const HISTORY_KEY: &str = "translationHistory";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationHistoryItem {
    pub id: String,
    pub from_text: String,
    pub to_text: String,
    pub from_lang: String,
    pub to_lang: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl TranslationHistoryItem {
    pub fn new(
        from_text: impl Into<String>,
        to_text: impl Into<String>,
        from_lang: impl Into<String>,
        to_lang: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_text: from_text.into(),
            to_text: to_text.into(),
            from_lang: from_lang.into(),
            to_lang: to_lang.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether `self` only extends `previous` while the user is still typing.
    fn continues(&self, previous: &Self, window_ms: i64) -> bool {
        let old_text = previous.from_text.trim();
        let new_text = self.from_text.trim();
        let continuation = new_text == old_text || new_text.starts_with(old_text);
        continuation && self.timestamp - previous.timestamp < window_ms
    }
}

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    items: Mutex<Vec<TranslationHistoryItem>>,
    merge_window_ms: i64,
    limit: usize,
    revision: watch::Sender<u64>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: &Settings) -> Self {
        Self {
            store,
            items: Mutex::new(Vec::new()),
            merge_window_ms: settings.history_merge_window_ms,
            limit: settings.history_limit.max(1),
            revision: watch::Sender::new(0),
        }
    }

    /// Ticks on every change to the list.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Creates the store and loads whatever was persisted.
    pub fn open(store: Arc<dyn KeyValueStore>, settings: &Settings) -> Self {
        let history = Self::new(store, settings);
        history.load();
        history
    }

    pub fn load(&self) {
        let stored: Vec<TranslationHistoryItem> =
            load_json(self.store.as_ref(), HISTORY_KEY).unwrap_or_default();
        log::debug!("Loaded {} history entries", stored.len());
        *self.lock() = stored;
        self.bump();
    }

    pub fn items(&self) -> Vec<TranslationHistoryItem> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn add(&self, entry: TranslationHistoryItem) -> Result<(), StoreError> {
        let mut items = self.lock();
        items.insert(0, entry);
        self.save(&mut items)
    }

    /// Replaces the newest row when `entry` continues it within the merge
    /// window, otherwise prepends.
    pub fn add_or_update(&self, entry: TranslationHistoryItem) -> Result<(), StoreError> {
        let mut items = self.lock();

        let coalesce = items
            .first()
            .is_some_and(|last| entry.continues(last, self.merge_window_ms));

        if coalesce {
            log::debug!("Coalescing history entry into {}", items[0].id);
            items[0] = entry;
        } else {
            items.insert(0, entry);
        }

        self.save(&mut items)
    }

    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut items = self.lock();
        let before = items.len();
        items.retain(|item| item.id != id);
        let removed = items.len() != before;
        self.save(&mut items)?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.lock().clear();
        self.bump();
        self.store.remove(HISTORY_KEY)
    }

    fn save(&self, items: &mut Vec<TranslationHistoryItem>) -> Result<(), StoreError> {
        items.truncate(self.limit);
        self.bump();
        save_json(self.store.as_ref(), HISTORY_KEY, items.as_slice()).inspect_err(|e| {
            log::error!("Failed to persist history: {e}");
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TranslationHistoryItem>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
