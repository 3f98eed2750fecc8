//! User preferences. Currently only the UI language, read once at startup
//! and written through to the preference store on every change.

mod language;
mod store;

pub use language::Language;
pub use store::{MemoryPreferenceStore, PreferenceStore, TauriPreferenceStore, PREFERENCES_FILE};

use tracing::{info, warn};

use crate::error::Result;

/// Preference key holding the language code.
pub const LANGUAGE_KEY: &str = "language";

pub struct LanguageSettings<S: PreferenceStore> {
    store: S,
    current: Language,
}

impl<S: PreferenceStore> LanguageSettings<S> {
    /// Load the saved language, defaulting to French when nothing usable is stored.
    pub fn init(store: S) -> Self {
        let current = match store.get(LANGUAGE_KEY) {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                warn!("Ignoring unknown saved language '{}'", code);
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                warn!("Failed to read language preference: {}", e);
                Language::default()
            }
        };
        info!("UI language: {}", current);
        Self { store, current }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    /// Persist `language` first, then switch to it. On a store failure the
    /// current language is left unchanged.
    pub fn set(&mut self, language: Language) -> Result<Language> {
        self.store.set(LANGUAGE_KEY, language.code())?;
        self.current = language;
        info!("UI language set to {}", language);
        Ok(language)
    }

    pub fn toggle(&mut self) -> Result<Language> {
        self.set(self.current.toggled())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::LessonKitError;

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(LessonKitError::Store("disk unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(LessonKitError::Store("disk unavailable".into()))
        }
    }

    #[test]
    fn test_defaults_to_french() {
        let settings = LanguageSettings::init(MemoryPreferenceStore::default());
        assert_eq!(settings.current(), Language::Fr);
    }

    #[test]
    fn test_toggle_survives_reload() {
        let store = Arc::new(MemoryPreferenceStore::default());

        let mut settings = LanguageSettings::init(store.clone());
        assert_eq!(settings.toggle().unwrap(), Language::Ar);
        assert_eq!(store.get(LANGUAGE_KEY).unwrap().as_deref(), Some("ar"));

        let reloaded = LanguageSettings::init(store.clone());
        assert_eq!(reloaded.current(), Language::Ar);
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let store = MemoryPreferenceStore::default();
        store.set(LANGUAGE_KEY, "en").unwrap();
        assert_eq!(LanguageSettings::init(store).current(), Language::Fr);
    }

    #[test]
    fn test_failed_write_keeps_language() {
        let mut settings = LanguageSettings::init(BrokenStore);
        assert_eq!(settings.current(), Language::Fr);
        assert!(settings.toggle().is_err());
        assert_eq!(settings.current(), Language::Fr);
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code(" AR "), Some(Language::Ar));
        assert_eq!(Language::from_code("de"), None);
        assert!(Language::Ar.is_rtl());
        assert_eq!(Language::Fr.toggled().toggled(), Language::Fr);
        assert_eq!(serde_json::to_string(&Language::Ar).unwrap(), "\"ar\"");
    }
}
