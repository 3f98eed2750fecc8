use tauri::Manager;

use crate::profile::{ProfileField, ProfileSession, SaveOutcome, TeacherProfile};
use crate::settings::Language;

/// Fetch the stored profile into the form. Never fails on backend errors.
#[tauri::command]
pub async fn load_teacher_profile(app: tauri::AppHandle) -> Result<TeacherProfile, String> {
    let session = app.state::<ProfileSession>();
    Ok(session.load().await?)
}

#[tauri::command]
pub fn update_profile_field(
    app: tauri::AppHandle,
    language: Language,
    field: ProfileField,
    value: String,
) -> Result<TeacherProfile, String> {
    let session = app.state::<ProfileSession>();
    Ok(session.update(language, field, value)?)
}

#[tauri::command]
pub async fn save_teacher_profile(app: tauri::AppHandle) -> Result<SaveOutcome, String> {
    let session = app.state::<ProfileSession>();
    Ok(session.save().await?)
}
