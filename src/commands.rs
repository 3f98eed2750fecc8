use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::i18n::Language;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

// -- Types matching the backend --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeLevel {
    Subject,
    Level,
    Period,
    Week,
    Session,
}

impl CascadeLevel {
    pub const ALL: [CascadeLevel; 5] = [
        CascadeLevel::Subject,
        CascadeLevel::Level,
        CascadeLevel::Period,
        CascadeLevel::Week,
        CascadeLevel::Session,
    ];

    /// Translation key of the dropdown label.
    pub fn label_key(self) -> &'static str {
        match self {
            CascadeLevel::Subject => "subject",
            CascadeLevel::Level => "level",
            CascadeLevel::Period => "period",
            CascadeLevel::Week => "week",
            CascadeLevel::Session => "session",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectionState {
    pub subject: Option<String>,
    pub level: Option<String>,
    pub period: Option<String>,
    pub week: Option<String>,
    pub session: Option<String>,
}

impl SelectionState {
    pub fn get(&self, level: CascadeLevel) -> Option<&str> {
        match level {
            CascadeLevel::Subject => self.subject.as_deref(),
            CascadeLevel::Level => self.level.as_deref(),
            CascadeLevel::Period => self.period.as_deref(),
            CascadeLevel::Week => self.week.as_deref(),
            CascadeLevel::Session => self.session.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CascadeOptions {
    pub subjects: Vec<String>,
    pub levels: Vec<String>,
    pub periods: Vec<String>,
    pub weeks: Vec<String>,
    pub sessions: Vec<String>,
}

impl CascadeOptions {
    pub fn for_level(&self, level: CascadeLevel) -> &[String] {
        match level {
            CascadeLevel::Subject => &self.subjects,
            CascadeLevel::Level => &self.levels,
            CascadeLevel::Period => &self.periods,
            CascadeLevel::Week => &self.weeks,
            CascadeLevel::Session => &self.sessions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LessonRecord {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Incomplete,
    NotFound,
    Resolved { record: LessonRecord },
    Ambiguous { ids: Vec<i64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    LoadingCatalog,
    Ready,
    Generating,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    Analyzing,
    Rendering,
}

impl Progress {
    pub fn label_key(self) -> &'static str {
        match self {
            Progress::Analyzing => "analyzing",
            Progress::Rendering => "rendering",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CatalogLoad,
    Generation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkflowError {
    pub kind: ErrorKind,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationResult {
    pub title: String,
    #[serde(default)]
    pub lesson_data: serde_json::Value,
    pub pdf_path: Option<String>,
    pub mindmap_pdf_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkflowSnapshot {
    pub view: Option<u64>,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Lesson,
    Mindmap,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyLessonResult {
    pub title: String,
    #[serde(default)]
    pub csv_data: serde_json::Value,
    pub pdf_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Ppr,
    SchoolYear,
    School,
    Level,
}

impl ProfileField {
    pub fn key(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Fr, ProfileField::Name) => "Nom",
            (Language::Fr, ProfileField::Ppr) => "PPR",
            (Language::Fr, ProfileField::SchoolYear) => "Année Scolaire",
            (Language::Fr, ProfileField::School) => "Établissement",
            (Language::Fr, ProfileField::Level) => "Niveau",
            (Language::Ar, ProfileField::Name) => "الأستاذ",
            (Language::Ar, ProfileField::Ppr) => "رقم التأجير",
            (Language::Ar, ProfileField::SchoolYear) => "السنة الدراسية",
            (Language::Ar, ProfileField::School) => "المؤسسة",
            (Language::Ar, ProfileField::Level) => "المستوى",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Ppr => "ppr",
            ProfileField::SchoolYear => "schoolYear",
            ProfileField::School => "school",
            ProfileField::Level => "teachingLevel",
        }
    }
}

/// Profile as sent by the backend: one object per language, keyed by the
/// backend's field names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeacherProfile {
    #[serde(default)]
    pub fr: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub ar: serde_json::Map<String, serde_json::Value>,
}

impl TeacherProfile {
    pub fn get(&self, language: Language, field: ProfileField) -> String {
        let block = match language {
            Language::Fr => &self.fr,
            Language::Ar => &self.ar,
        };
        block
            .get(field.key(language))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    MissingName,
    Rejected { status: u16 },
    Failed { reason: String },
}

impl SaveOutcome {
    pub fn message_key(&self) -> &'static str {
        match self {
            SaveOutcome::Saved => "profileSaved",
            SaveOutcome::MissingName => "fillNameError",
            SaveOutcome::Rejected { .. } => "failedSave",
            SaveOutcome::Failed { .. } => "errorSaving",
        }
    }
}

// -- Arg structs for serialization --

#[derive(Serialize)]
struct TokenArgs {
    token: u64,
}

#[derive(Serialize)]
struct SelectFilterArgs {
    token: u64,
    level: CascadeLevel,
    value: Option<String>,
}

#[derive(Serialize)]
struct DownloadArgs {
    token: u64,
    kind: ArtifactKind,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadArgs {
    file_name: String,
    contents_base64: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DownloadUploadArgs {
    pdf_path: Option<String>,
}

#[derive(Serialize)]
struct UpdateProfileFieldArgs {
    language: Language,
    field: ProfileField,
    value: String,
}

// -- Typed invoke helpers --

async fn call<A: Serialize, T: DeserializeOwned>(cmd: &str, args: &A) -> Result<T, String> {
    // Maps must arrive as plain objects for Tauri's JSON argument parsing.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let args = args.serialize(&serializer).map_err(|e| e.to_string())?;

    let result = invoke(cmd, args)
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| "Unknown error".to_string()))?;

    serde_wasm_bindgen::from_value(result)
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn call_no_args<T: DeserializeOwned>(cmd: &str) -> Result<T, String> {
    let result = invoke(cmd, JsValue::NULL)
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| "Unknown error".to_string()))?;

    serde_wasm_bindgen::from_value(result)
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn get_language() -> Result<Language, String> {
    call_no_args("get_language").await
}

pub async fn toggle_language() -> Result<Language, String> {
    call_no_args("toggle_language").await
}

pub async fn open_generator() -> Result<WorkflowSnapshot, String> {
    call_no_args("open_generator").await
}

pub async fn load_catalog(token: u64) -> Result<WorkflowSnapshot, String> {
    call("load_catalog", &TokenArgs { token }).await
}

pub async fn close_generator(token: u64) -> Result<bool, String> {
    call("close_generator", &TokenArgs { token }).await
}

pub async fn select_filter(
    token: u64,
    level: CascadeLevel,
    value: Option<String>,
) -> Result<WorkflowSnapshot, String> {
    call("select_filter", &SelectFilterArgs { token, level, value }).await
}

pub async fn generation_snapshot() -> Result<WorkflowSnapshot, String> {
    call_no_args("generation_snapshot").await
}

pub async fn generate_lesson(token: u64) -> Result<WorkflowSnapshot, String> {
    call("generate_lesson", &TokenArgs { token }).await
}

pub async fn retry_generation(token: u64) -> Result<WorkflowSnapshot, String> {
    call("retry_generation", &TokenArgs { token }).await
}

/// Returns the saved file path, or `None` when there was nothing to download.
pub async fn download_artifact(token: u64, kind: ArtifactKind) -> Result<Option<String>, String> {
    call("download_artifact", &DownloadArgs { token, kind }).await
}

pub async fn generate_from_upload(
    file_name: String,
    contents_base64: String,
) -> Result<LegacyLessonResult, String> {
    call(
        "generate_from_upload",
        &UploadArgs {
            file_name,
            contents_base64,
        },
    )
    .await
}

pub async fn download_upload_pdf(pdf_path: Option<String>) -> Result<Option<String>, String> {
    call("download_upload_pdf", &DownloadUploadArgs { pdf_path }).await
}

pub async fn load_teacher_profile() -> Result<TeacherProfile, String> {
    call_no_args("load_teacher_profile").await
}

pub async fn update_profile_field(
    language: Language,
    field: ProfileField,
    value: String,
) -> Result<TeacherProfile, String> {
    call(
        "update_profile_field",
        &UpdateProfileFieldArgs {
            language,
            field,
            value,
        },
    )
    .await
}

pub async fn save_teacher_profile() -> Result<SaveOutcome, String> {
    call_no_args("save_teacher_profile").await
}
