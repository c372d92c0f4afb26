use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::storage::{load_json, save_json, KeyValueStore};

const SETTINGS_KEY: &str = "settings";

/// Tunables for the orchestration layer. Missing fields fall back to defaults,
/// so an older stored blob keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub debounce_ms: u64,
    pub history_merge_window_ms: i64,
    pub history_limit: usize,
    pub plugin_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            history_merge_window_ms: 3_000,
            history_limit: 200,
            plugin_timeout_secs: 15,
            download_timeout_secs: 600,
        }
    }
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn plugin_timeout(&self) -> Duration {
        Duration::from_secs(self.plugin_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

pub fn get_settings(store: &dyn KeyValueStore) -> Settings {
    load_json(store, SETTINGS_KEY).unwrap_or_default()
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), StoreError> {
    save_json(store, SETTINGS_KEY, settings)
}
