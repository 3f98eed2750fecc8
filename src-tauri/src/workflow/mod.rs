//! Generator view lifecycle: catalog load, generation, retry and downloads.
//!
//! [`GenerationController`] is the synchronous state machine;
//! [`GeneratorSession`] wraps it with the backend client for the Tauri
//! commands.

mod controller;
mod session;

use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::{info, warn};

use crate::error::{LessonKitError, Result};

pub use controller::{
    ErrorKind, GenerationController, GenerationTicket, Phase, Progress, ViewToken, WorkflowError,
    WorkflowSnapshot,
};
pub use session::GeneratorSession;

/// Directory generated files are saved to: the user's download folder,
/// falling back to the home directory and then the temp directory.
pub fn download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Write a downloaded file into `dir`, replacing any file of the same name.
pub async fn save_artifact(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    info!("Saved {} to {}", filename, path.display());
    Ok(path)
}

/// Check and decode a slide deck picked for the legacy upload.
pub fn decode_upload(file_name: &str, contents_base64: &str) -> Result<Vec<u8>> {
    if !file_name.to_ascii_lowercase().ends_with(".pptx") {
        return Err(LessonKitError::precondition("Please select a PPTX file."));
    }
    base64::engine::general_purpose::STANDARD
        .decode(contents_base64)
        .map_err(|e| {
            warn!("Upload of {} is not valid base64: {}", file_name, e);
            LessonKitError::precondition(format!("Failed to read {}: {}", file_name, e))
        })
}
