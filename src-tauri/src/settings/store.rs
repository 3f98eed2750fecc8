use std::collections::HashMap;
use std::sync::Mutex;

use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::error::{LessonKitError, Result};

/// File backing the user preferences (inside the app data directory).
pub const PREFERENCES_FILE: &str = "preferences.json";

/// String key/value storage for user preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Preferences persisted through `tauri-plugin-store`.
pub struct TauriPreferenceStore {
    app: AppHandle,
}

impl TauriPreferenceStore {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl PreferenceStore for TauriPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self
            .app
            .store(PREFERENCES_FILE)
            .map_err(|e| LessonKitError::Store(e.to_string()))?;
        Ok(store.get(key).and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let store = self
            .app
            .store(PREFERENCES_FILE)
            .map_err(|e| LessonKitError::Store(e.to_string()))?;
        store.set(key, serde_json::json!(value));
        store
            .save()
            .map_err(|e| LessonKitError::Store(e.to_string()))
    }
}

/// In-process store for tests.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| LessonKitError::Store("preference lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| LessonKitError::Store("preference lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
