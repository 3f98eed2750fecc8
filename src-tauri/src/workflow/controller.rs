use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::{ArtifactKind, GenerationResult};
use crate::catalog::{CascadeLevel, CascadeOptions, Catalog, LessonRecord, Resolution, SelectionState};
use crate::error::{LessonKitError, Result};

/// Lifecycle of the generator view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    LoadingCatalog,
    Ready,
    Generating,
    Succeeded,
    Failed,
}

impl Phase {
    /// Phases in which the dropdowns can be changed.
    pub fn accepts_selection(self) -> bool {
        matches!(self, Phase::Ready | Phase::Succeeded | Phase::Failed)
    }
}

/// Progress label shown while a generation is running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    /// Request sent, waiting for the backend to answer.
    Analyzing,
    /// Response head received, body still being produced.
    Rendering,
}

/// Identifies one opening of the generator view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ViewToken(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CatalogLoad,
    Generation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowError {
    pub kind: ErrorKind,
    pub message: String,
    /// Translation key of an extra hint, if any.
    pub hint: Option<String>,
}

/// A generation the controller has accepted; the caller performs the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    pub token: ViewToken,
    pub lesson_id: i64,
}

/// Everything the generator page renders, in one serializable value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkflowSnapshot {
    pub view: Option<ViewToken>,
    pub phase: Phase,
    pub progress: Option<Progress>,
    pub error: Option<WorkflowError>,
    pub catalog_size: usize,
    pub selection: SelectionState,
    pub options: CascadeOptions,
    pub resolution: Resolution,
    pub result: Option<GenerationResult>,
    pub can_generate: bool,
    pub can_retry: bool,
    pub can_download_lesson: bool,
    pub can_download_mindmap: bool,
}

/// State machine behind the generator view.
///
/// All methods are synchronous; network calls happen outside, and their
/// completions are handed back with the token of the view that started them.
/// A completion for a view that has since been closed or replaced is dropped.
#[derive(Debug, Default)]
pub struct GenerationController {
    last_token: u64,
    view: Option<ViewToken>,
    phase: Phase,
    progress: Option<Progress>,
    catalog: Catalog,
    catalog_requested: bool,
    selection: SelectionState,
    result: Option<GenerationResult>,
    error: Option<WorkflowError>,
    last_lesson: Option<i64>,
}

impl GenerationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> Option<Progress> {
        self.progress
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_current(&self, token: ViewToken) -> bool {
        self.view == Some(token)
    }

    /// Start a new view. Any previous view is invalidated along with its state.
    pub fn open_view(&mut self) -> ViewToken {
        self.last_token += 1;
        let token = ViewToken(self.last_token);
        *self = Self {
            last_token: self.last_token,
            view: Some(token),
            phase: Phase::LoadingCatalog,
            ..Self::default()
        };
        info!("Opened generator view {}", token.0);
        token
    }

    /// Returns `false` if `token` was not the open view.
    pub fn close_view(&mut self, token: ViewToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        *self = Self {
            last_token: self.last_token,
            ..Self::default()
        };
        info!("Closed generator view {}", token.0);
        true
    }

    /// Claim the single catalog request of this view.
    pub fn begin_catalog_load(&mut self, token: ViewToken) -> Result<()> {
        self.ensure_current(token)?;
        if self.phase != Phase::LoadingCatalog || self.catalog_requested {
            return Err(LessonKitError::precondition("The catalog is already loaded"));
        }
        self.catalog_requested = true;
        Ok(())
    }

    /// Apply the catalog response. Returns `false` when it was discarded.
    pub fn finish_catalog_load(
        &mut self,
        token: ViewToken,
        outcome: Result<Vec<LessonRecord>>,
    ) -> bool {
        if !self.is_current(token) || self.phase != Phase::LoadingCatalog {
            info!("Discarding catalog response for view {}", token.0);
            return false;
        }

        match outcome {
            Ok(records) => {
                info!("Catalog ready with {} lessons", records.len());
                self.catalog = Catalog::new(records);
                self.error = None;
            }
            Err(e) => {
                warn!("Catalog load failed: {}", e);
                self.catalog = Catalog::default();
                self.error = Some(WorkflowError {
                    kind: ErrorKind::CatalogLoad,
                    message: e.to_string(),
                    hint: Some("checkBackend".to_string()),
                });
            }
        }
        self.phase = Phase::Ready;
        true
    }

    /// Change one dropdown; deeper dropdowns are cleared.
    pub fn select(
        &mut self,
        token: ViewToken,
        level: CascadeLevel,
        value: Option<String>,
    ) -> Result<()> {
        self.ensure_current(token)?;
        if !self.phase.accepts_selection() {
            return Err(LessonKitError::precondition(format!(
                "Cannot change the {} while {:?}",
                level, self.phase
            )));
        }
        let value = value.filter(|v| !v.trim().is_empty());
        if let Some(v) = value.as_deref() {
            let offered = self
                .catalog
                .options(level, &self.selection)
                .iter()
                .any(|o| o == v);
            if self.selection.parents_set(level) && !offered {
                return Err(LessonKitError::precondition(format!(
                    "\"{}\" is not an available {}",
                    v, level
                )));
            }
        }
        if !self.selection.select(level, value) {
            return Err(LessonKitError::precondition(format!(
                "Choose the {} first",
                level
                    .parents()
                    .iter()
                    .find(|p| self.selection.get(**p).is_none())
                    .map(|p| p.as_str())
                    .unwrap_or("previous level")
            )));
        }
        Ok(())
    }

    /// Accept a generation for the resolved lesson.
    pub fn begin_generation(&mut self, token: ViewToken) -> Result<GenerationTicket> {
        self.ensure_idle_for_generation(token)?;

        let lesson_id = match self.catalog.resolve(&self.selection) {
            Resolution::Resolved { record } => record.id,
            Resolution::Incomplete => {
                return Err(LessonKitError::precondition("Select all five filters first"))
            }
            Resolution::NotFound => {
                return Err(LessonKitError::precondition(
                    "No lesson matches this selection",
                ))
            }
            Resolution::Ambiguous { ids } => {
                warn!("Selection matches several lessons: {:?}", ids);
                return Err(LessonKitError::precondition(format!(
                    "Several lessons match this selection ({} records)",
                    ids.len()
                )));
            }
        };

        Ok(self.start(token, lesson_id))
    }

    /// Re-issue the request that just failed.
    pub fn begin_retry(&mut self, token: ViewToken) -> Result<GenerationTicket> {
        self.ensure_current(token)?;
        match (self.phase, self.last_lesson) {
            (Phase::Failed, Some(lesson_id)) => Ok(self.start(token, lesson_id)),
            _ => Err(LessonKitError::precondition("There is no failed generation to retry")),
        }
    }

    /// The backend has started answering.
    pub fn mark_rendering(&mut self, token: ViewToken) -> bool {
        if !self.is_current(token) || self.phase != Phase::Generating {
            return false;
        }
        self.progress = Some(Progress::Rendering);
        true
    }

    /// Apply the generation outcome. Returns `false` when it was discarded.
    pub fn finish_generation(
        &mut self,
        token: ViewToken,
        outcome: Result<GenerationResult>,
    ) -> bool {
        if !self.is_current(token) || self.phase != Phase::Generating {
            info!("Discarding generation response for view {}", token.0);
            return false;
        }

        self.progress = None;
        match outcome {
            Ok(result) => {
                info!("Generated '{}'", result.title);
                self.result = Some(result);
                self.phase = Phase::Succeeded;
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                self.error = Some(WorkflowError {
                    kind: ErrorKind::Generation,
                    message: generation_message(&e),
                    hint: None,
                });
                self.phase = Phase::Failed;
            }
        }
        true
    }

    /// File name to download for `kind`, or `None` when the result has no such file.
    pub fn download_filename(&self, token: ViewToken, kind: ArtifactKind) -> Result<Option<String>> {
        self.ensure_current(token)?;
        match (&self.phase, &self.result) {
            (Phase::Succeeded, Some(result)) => Ok(result.filename_for(kind)),
            _ => Err(LessonKitError::precondition("Nothing has been generated yet")),
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let resolution = self.catalog.resolve(&self.selection);
        let can_generate = self.view.is_some()
            && self.phase.accepts_selection()
            && resolution.record().is_some();
        let downloadable = |kind: ArtifactKind| {
            self.phase == Phase::Succeeded
                && self
                    .result
                    .as_ref()
                    .and_then(|r| r.filename_for(kind))
                    .is_some()
        };

        WorkflowSnapshot {
            view: self.view,
            phase: self.phase,
            progress: self.progress,
            error: self.error.clone(),
            catalog_size: self.catalog.len(),
            selection: self.selection.clone(),
            options: self.catalog.cascade(&self.selection),
            can_generate,
            can_retry: self.phase == Phase::Failed && self.last_lesson.is_some(),
            can_download_lesson: downloadable(ArtifactKind::Lesson),
            can_download_mindmap: downloadable(ArtifactKind::Mindmap),
            resolution,
            result: self.result.clone(),
        }
    }

    fn start(&mut self, token: ViewToken, lesson_id: i64) -> GenerationTicket {
        info!("Generating lesson {}", lesson_id);
        self.phase = Phase::Generating;
        self.progress = Some(Progress::Analyzing);
        self.error = None;
        self.result = None;
        self.last_lesson = Some(lesson_id);
        GenerationTicket { token, lesson_id }
    }

    fn ensure_current(&self, token: ViewToken) -> Result<()> {
        if self.is_current(token) {
            Ok(())
        } else {
            Err(LessonKitError::StaleView)
        }
    }

    fn ensure_idle_for_generation(&self, token: ViewToken) -> Result<()> {
        self.ensure_current(token)?;
        match self.phase {
            Phase::Generating => Err(LessonKitError::precondition(
                "A generation is already running",
            )),
            phase if phase.accepts_selection() => Ok(()),
            _ => Err(LessonKitError::precondition("The catalog is not loaded yet")),
        }
    }
}

/// Message shown for a failed generation: the backend's own text when it
/// sent one, otherwise the error description.
fn generation_message(err: &LessonKitError) -> String {
    match err {
        LessonKitError::Status { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
