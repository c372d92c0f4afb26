use std::sync::Arc;

use serde_json::Value;
use tauri::{AppHandle, Runtime};
use tauri_plugin_store::{Store, StoreExt};

use super::KeyValueStore;
use crate::error::StoreError;

const STORE_PATH: &str = "parley.json";

/// `tauri-plugin-store` backed storage; the file is saved after every write.
pub struct TauriKvStore<R: Runtime> {
    store: Arc<Store<R>>,
}

impl<R: Runtime> TauriKvStore<R> {
    pub fn open(app: &AppHandle<R>) -> Result<Self, StoreError> {
        let store = app
            .store(STORE_PATH)
            .map_err(|e| StoreError::Backend(format!("Failed to open store: {e}")))?;
        Ok(Self { store })
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store
            .save()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl<R: Runtime> KeyValueStore for TauriKvStore<R> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.store.get(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.store.set(key, value);
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete(key);
        self.persist()
    }
}
