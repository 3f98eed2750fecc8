use reqwest::header::CONTENT_TYPE;
use reqwest::{multipart, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::types::{ErrorBody, GenerationResult, LegacyLessonResult};
use crate::catalog::LessonRecord;
use crate::config::BackendConfig;
use crate::error::{LessonKitError, Result};
use crate::profile::TeacherProfile;

/// Typed client for the lesson backend.
///
/// No request timeout is configured: generation can take minutes and the
/// backend being down surfaces as a transport error.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    config: BackendConfig,
}

/// A generation request whose response head has arrived but whose body has
/// not been read yet.
pub struct PendingGeneration {
    response: Response,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("LessonKit/1.0")
            .build()
            .expect("Failed to build reqwest client");

        Self { client, config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// `GET /lessons`
    pub async fn list_lessons(&self) -> Result<Vec<LessonRecord>> {
        let url = self.config.endpoint("lessons")?;
        info!("Fetching lesson catalog from {}", url);

        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, "Could not load lessons").await?;
        let lessons: Vec<LessonRecord> = read_json(response).await?;

        info!("Loaded {} lessons", lessons.len());
        Ok(lessons)
    }

    /// Send `POST /generate_from_id/{id}` and wait for the response head.
    pub async fn start_generation(&self, lesson_id: i64) -> Result<PendingGeneration> {
        let url = self.config.endpoint(&format!("generate_from_id/{}", lesson_id))?;
        info!("Requesting generation for lesson {}", lesson_id);

        let response = self.client.post(url).send().await?;
        Ok(PendingGeneration { response })
    }

    /// Full generation round trip for one lesson.
    pub async fn generate_from_id(&self, lesson_id: i64) -> Result<GenerationResult> {
        self.start_generation(lesson_id).await?.finish().await
    }

    /// `GET /download_pdf/{filename}`
    pub async fn download_artifact(&self, filename: &str) -> Result<Vec<u8>> {
        let url = self
            .config
            .endpoint(&format!("download_pdf/{}", urlencoding::encode(filename)))?;
        info!("Downloading {}", url);

        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, "PDF not found").await?;
        let bytes = response.bytes().await?;

        info!("Downloaded {} ({} bytes)", filename, bytes.len());
        Ok(bytes.to_vec())
    }

    /// `GET /teacher-info`
    ///
    /// The backend answers with a list holding at most one profile. An empty
    /// list, or a body that is not JSON at all, yields an empty profile.
    pub async fn fetch_teacher_profile(&self) -> Result<TeacherProfile> {
        let url = self.config.endpoint("teacher-info")?;
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, "Server error").await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            warn!("Received non-JSON response from /teacher-info, using an empty profile");
            return Ok(TeacherProfile::default());
        }

        let body: serde_json::Value = read_json(response).await?;
        let first = match body {
            serde_json::Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            serde_json::Value::Array(_) => return Ok(TeacherProfile::default()),
            other => {
                warn!("Unexpected /teacher-info payload shape: {}", other);
                return Ok(TeacherProfile::default());
            }
        };

        let mut profile: TeacherProfile = serde_json::from_value(first)?;
        profile.mirror_shared();
        Ok(profile)
    }

    /// `POST /teacher-info` with `[profile]`. Any 2xx status counts as saved.
    pub async fn save_teacher_profile(&self, profile: &TeacherProfile) -> Result<()> {
        let url = self.config.endpoint("teacher-info")?;
        info!("Saving teacher profile");

        let response = self.client.post(url).json(&[profile]).send().await?;
        ensure_success(response, "Failed to save profile").await?;
        Ok(())
    }

    /// Legacy `POST /generate`: upload a slide deck and let the backend build
    /// the lesson from it.
    pub async fn generate_from_upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<LegacyLessonResult> {
        let url = self.config.endpoint("generate")?;
        info!("Uploading {} ({} bytes) for generation", file_name, contents.len());

        let part = multipart::Part::bytes(contents).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        let response = ensure_success(response, "Unknown error during generation").await?;
        read_json(response).await
    }
}

impl PendingGeneration {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Read and decode the body into a result, or into the backend's error message.
    pub async fn finish(self) -> Result<GenerationResult> {
        let response = ensure_success(self.response, "Generation failed").await?;
        let result: GenerationResult = read_json(response).await?;
        info!("Generation finished: {}", result.title);
        Ok(result)
    }
}

/// Turn a non-success response into `LessonKitError::Status`, using the
/// backend's `{"error": ...}` message when it sent one.
async fn ensure_success(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body, fallback);
    warn!("Backend returned {}: {}", status.as_u16(), message);

    Err(LessonKitError::Status {
        status: status.as_u16(),
        message,
    })
}

pub(crate) fn error_message(status: StatusCode, body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "{} ({} {})",
                fallback,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
