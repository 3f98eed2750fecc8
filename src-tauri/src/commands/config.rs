use std::sync::Mutex;

use tauri::Manager;
use tracing::warn;

use crate::settings::{Language, LanguageSettings, TauriPreferenceStore};

/// Managed language preference, backed by `preferences.json`.
pub struct LanguageState(pub Mutex<LanguageSettings<TauriPreferenceStore>>);

fn with_settings<T>(
    app: &tauri::AppHandle,
    f: impl FnOnce(&mut LanguageSettings<TauriPreferenceStore>) -> crate::error::Result<T>,
) -> Result<T, String> {
    let state = app.state::<LanguageState>();
    let mut settings = state.0.lock().map_err(|e| {
        warn!("Language state lock poisoned: {}", e);
        "Language settings are unavailable".to_string()
    })?;
    f(&mut settings).map_err(|e| {
        warn!("Failed to update language: {}", e);
        e.to_string()
    })
}

#[tauri::command]
pub fn get_language(app: tauri::AppHandle) -> Result<Language, String> {
    with_settings(&app, |settings| Ok(settings.current()))
}

/// Switch between French and Arabic and persist the choice.
#[tauri::command]
pub fn toggle_language(app: tauri::AppHandle) -> Result<Language, String> {
    with_settings(&app, |settings| settings.toggle())
}
