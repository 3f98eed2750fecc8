use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::info;

use super::controller::{GenerationController, GenerationTicket, ViewToken, WorkflowSnapshot};
use crate::api::{artifact_filename, ArtifactKind, BackendClient};
use crate::catalog::CascadeLevel;
use crate::error::{LessonKitError, Result};

/// Drives a [`GenerationController`] against the backend.
///
/// The controller lock is only taken between awaits, so several commands can
/// run concurrently and a slow request never blocks snapshot reads.
pub struct GeneratorSession {
    controller: Mutex<GenerationController>,
    client: BackendClient,
}

impl GeneratorSession {
    pub fn new(client: BackendClient) -> Self {
        Self {
            controller: Mutex::new(GenerationController::new()),
            client,
        }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Open a fresh generator view. The catalog is fetched by [`load_catalog`](Self::load_catalog).
    pub fn open(&self) -> Result<WorkflowSnapshot> {
        let mut controller = self.lock()?;
        controller.open_view();
        Ok(controller.snapshot())
    }

    pub fn close(&self, token: ViewToken) -> Result<bool> {
        Ok(self.lock()?.close_view(token))
    }

    pub fn snapshot(&self) -> Result<WorkflowSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    /// Fetch the lesson list for the view identified by `token`.
    ///
    /// A backend failure is not an error here: it ends up in the snapshot.
    pub async fn load_catalog(&self, token: ViewToken) -> Result<WorkflowSnapshot> {
        {
            let mut controller = self.lock()?;
            controller.begin_catalog_load(token)?;
        }

        let outcome = self.client.list_lessons().await;

        let mut controller = self.lock()?;
        if !controller.finish_catalog_load(token, outcome) {
            return Err(LessonKitError::StaleView);
        }
        Ok(controller.snapshot())
    }

    pub fn select(
        &self,
        token: ViewToken,
        level: CascadeLevel,
        value: Option<String>,
    ) -> Result<WorkflowSnapshot> {
        let mut controller = self.lock()?;
        controller.select(token, level, value)?;
        Ok(controller.snapshot())
    }

    /// Generate the resolved lesson. Backend failures land in the snapshot;
    /// only local rejections are returned as errors.
    pub async fn generate(&self, token: ViewToken) -> Result<WorkflowSnapshot> {
        let ticket = {
            let mut controller = self.lock()?;
            controller.begin_generation(token)?
        };
        self.run(ticket).await
    }

    pub async fn retry(&self, token: ViewToken) -> Result<WorkflowSnapshot> {
        let ticket = {
            let mut controller = self.lock()?;
            controller.begin_retry(token)?
        };
        info!("Retrying generation of lesson {}", ticket.lesson_id);
        self.run(ticket).await
    }

    /// Fetch one generated file into `target_dir`.
    ///
    /// Returns `Ok(None)` when the current result has no file of that kind.
    pub async fn download(
        &self,
        token: ViewToken,
        kind: ArtifactKind,
        target_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let filename = {
            let controller = self.lock()?;
            controller.download_filename(token, kind)?
        };
        let Some(filename) = filename else {
            info!("No {:?} file in the current result", kind);
            return Ok(None);
        };

        let bytes = self.client.download_artifact(&filename).await?;
        Ok(Some(super::save_artifact(target_dir, &filename, &bytes).await?))
    }

    /// Fetch the PDF named by a legacy upload result into `target_dir`.
    ///
    /// Independent of the generator view. Returns `Ok(None)` without a request
    /// when the path is absent or has no file name.
    pub async fn download_upload_pdf(
        &self,
        pdf_path: Option<&str>,
        target_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some(filename) = pdf_path.and_then(artifact_filename) else {
            info!("Upload result has no PDF to download");
            return Ok(None);
        };
        let bytes = self.client.download_artifact(&filename).await?;
        Ok(Some(super::save_artifact(target_dir, &filename, &bytes).await?))
    }

    async fn run(&self, ticket: GenerationTicket) -> Result<WorkflowSnapshot> {
        let outcome = match self.client.start_generation(ticket.lesson_id).await {
            Ok(pending) => {
                {
                    let mut controller = self.lock()?;
                    controller.mark_rendering(ticket.token);
                }
                pending.finish().await
            }
            Err(e) => Err(e),
        };

        let mut controller = self.lock()?;
        if !controller.finish_generation(ticket.token, outcome) {
            return Err(LessonKitError::StaleView);
        }
        Ok(controller.snapshot())
    }

    fn lock(&self) -> Result<MutexGuard<'_, GenerationController>> {
        self.controller
            .lock()
            .map_err(|_| LessonKitError::State("generator state lock poisoned".to_string()))
    }
}
