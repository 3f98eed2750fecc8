pub mod api;
pub mod catalog;
mod commands;
pub mod config;
pub mod error;
pub mod profile;
pub mod settings;
pub mod workflow;

pub use error::{LessonKitError, Result};

use std::sync::Mutex;

use tauri::Manager;

use crate::api::BackendClient;
use crate::config::BackendConfig;
use crate::profile::ProfileSession;
use crate::settings::{LanguageSettings, TauriPreferenceStore};
use crate::workflow::GeneratorSession;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match BackendConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}; falling back to {}", e, crate::config::DEFAULT_API_URL);
            BackendConfig::default()
        }
    };
    tracing::info!("Using lesson backend at {}", config.base_url());
    let client = BackendClient::new(config);

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(GeneratorSession::new(client.clone()))
        .manage(ProfileSession::new(client))
        .invoke_handler(tauri::generate_handler![
            commands::config::get_language,
            commands::config::toggle_language,
            commands::generator::open_generator,
            commands::generator::load_catalog,
            commands::generator::close_generator,
            commands::generator::select_filter,
            commands::generator::generation_snapshot,
            commands::generator::generate_lesson,
            commands::generator::retry_generation,
            commands::generator::download_artifact,
            commands::generator::generate_from_upload,
            commands::generator::download_upload_pdf,
            commands::profile::load_teacher_profile,
            commands::profile::update_profile_field,
            commands::profile::save_teacher_profile,
        ])
        .setup(|app| {
            // The preference store needs the app handle, so language settings
            // are created here rather than before the builder.
            let store = TauriPreferenceStore::new(app.handle().clone());
            let settings = LanguageSettings::init(store);
            app.manage(commands::config::LanguageState(Mutex::new(settings)));
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
