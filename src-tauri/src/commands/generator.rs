use tauri::Manager;
use tracing::info;

use crate::api::{ArtifactKind, LegacyLessonResult};
use crate::catalog::CascadeLevel;
use crate::workflow::{self, GeneratorSession, ViewToken, WorkflowSnapshot};

/// Start a new generator view. Call `load_catalog` with the returned token next.
#[tauri::command]
pub fn open_generator(app: tauri::AppHandle) -> Result<WorkflowSnapshot, String> {
    let session = app.state::<GeneratorSession>();
    Ok(session.open()?)
}

#[tauri::command]
pub async fn load_catalog(
    app: tauri::AppHandle,
    token: ViewToken,
) -> Result<WorkflowSnapshot, String> {
    let session = app.state::<GeneratorSession>();
    Ok(session.load_catalog(token).await?)
}

/// Invalidate the view; responses still in flight for it are dropped.
#[tauri::command]
pub fn close_generator(app: tauri::AppHandle, token: ViewToken) -> Result<bool, String> {
    let session = app.state::<GeneratorSession>();
    Ok(session.close(token)?)
}

#[tauri::command]
pub fn select_filter(
    app: tauri::AppHandle,
    token: ViewToken,
    level: CascadeLevel,
    value: Option<String>,
) -> Result<WorkflowSnapshot, String> {
    let session = app.state::<GeneratorSession>();
    Ok(session.select(token, level, value)?)
}

#[tauri::command]
pub fn generation_snapshot(app: tauri::AppHandle) -> Result<WorkflowSnapshot, String> {
    let session = app.state::<GeneratorSession>();
    Ok(session.snapshot()?)
}

#[tauri::command]
pub async fn generate_lesson(
    app: tauri::AppHandle,
    token: ViewToken,
) -> Result<WorkflowSnapshot, String> {
    let session = app.state::<GeneratorSession>();
    Ok(session.generate(token).await?)
}

#[tauri::command]
pub async fn retry_generation(
    app: tauri::AppHandle,
    token: ViewToken,
) -> Result<WorkflowSnapshot, String> {
    let session = app.state::<GeneratorSession>();
    Ok(session.retry(token).await?)
}

/// Save a generated file to the download folder and return where it went.
#[tauri::command]
pub async fn download_artifact(
    app: tauri::AppHandle,
    token: ViewToken,
    kind: ArtifactKind,
) -> Result<Option<String>, String> {
    let session = app.state::<GeneratorSession>();
    let saved = session
        .download(token, kind, &workflow::download_dir())
        .await?;
    Ok(saved.map(|p| p.to_string_lossy().to_string()))
}

/// Legacy flow: upload a `.pptx` and generate directly from it.
#[tauri::command]
pub async fn generate_from_upload(
    app: tauri::AppHandle,
    file_name: String,
    contents_base64: String,
) -> Result<LegacyLessonResult, String> {
    let contents = workflow::decode_upload(&file_name, &contents_base64)?;
    info!("Legacy generation from {}", file_name);

    let session = app.state::<GeneratorSession>();
    Ok(session.client().generate_from_upload(&file_name, contents).await?)
}

/// Download the PDF produced by the legacy upload flow.
#[tauri::command]
pub async fn download_upload_pdf(
    app: tauri::AppHandle,
    pdf_path: Option<String>,
) -> Result<Option<String>, String> {
    let session = app.state::<GeneratorSession>();
    let saved = session
        .download_upload_pdf(pdf_path.as_deref(), &workflow::download_dir())
        .await?;
    Ok(saved.map(|p| p.to_string_lossy().to_string()))
}
