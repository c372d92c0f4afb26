//! String-keyed persistence for history, preferences and settings.

mod memory;
#[cfg(feature = "shell")]
mod tauri_store;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

pub use memory::MemoryStore;
#[cfg(feature = "shell")]
pub use tauri_store::TauriKvStore;

/// Key-value storage with JSON values. Implementations must be cheap to call
/// from the UI thread; there is exactly one writer.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reads and decodes `key`. A failed read or a value of the wrong shape is
/// treated as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read `{key}` from storage: {e}");
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::warn!("Ignoring undecodable `{key}` in storage: {e}");
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_value(value)?)
}
