//! In-process stand-in for the lesson backend, served with axum on a random port.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use lessonkit_tauri::api::BackendClient;
use lessonkit_tauri::config::BackendConfig;

pub const CATALOG_OK: u8 = 0;
pub const CATALOG_ERROR: u8 = 1;
pub const CATALOG_MALFORMED: u8 = 2;

#[derive(Default)]
pub struct StubState {
    pub catalog_mode: AtomicU8,
    pub generate_calls: AtomicUsize,
    /// Number of upcoming generations answered with a 500.
    pub failing_generations: AtomicUsize,
    pub generation_delay_ms: AtomicU64,
    /// `None` makes `GET /teacher-info` answer with HTML.
    pub teacher_info: Mutex<Option<Value>>,
    pub saved_profiles: Mutex<Vec<Value>>,
    pub reject_profile_save: AtomicBool,
    pub uploads: Mutex<Vec<usize>>,
}

pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubBackend {
    pub fn client(&self) -> BackendClient {
        BackendClient::new(BackendConfig::parse(&self.base_url).expect("stub URL is valid"))
    }

    pub fn generate_calls(&self) -> usize {
        self.state.generate_calls.load(Ordering::SeqCst)
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn lessons_fixture() -> Value {
    let raw = std::fs::read_to_string(fixture_path("lessons.json")).expect("lessons fixture");
    serde_json::from_str(&raw).expect("lessons fixture is JSON")
}

pub async fn spawn_backend() -> StubBackend {
    spawn_with(StubState {
        teacher_info: Mutex::new(Some(json!([]))),
        ..StubState::default()
    })
    .await
}

pub async fn spawn_with(state: StubState) -> StubBackend {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/lessons", get(lessons))
        .route("/generate_from_id/:id", post(generate_from_id))
        .route("/download_pdf/:filename", get(download_pdf))
        .route("/teacher-info", get(get_teacher_info).post(post_teacher_info))
        .route("/generate", post(upload))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend crashed");
    });

    StubBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn lessons(State(state): State<Arc<StubState>>) -> Response {
    match state.catalog_mode.load(Ordering::SeqCst) {
        CATALOG_ERROR => error(StatusCode::INTERNAL_SERVER_ERROR, "database offline"),
        CATALOG_MALFORMED => Json(json!([{ "id": "one", "title": 3 }])).into_response(),
        _ => Json(lessons_fixture()).into_response(),
    }
}

async fn generate_from_id(State(state): State<Arc<StubState>>, Path(id): Path<i64>) -> Response {
    state.generate_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.generation_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let failing = state.failing_generations.load(Ordering::SeqCst);
    if failing > 0 {
        state.failing_generations.store(failing - 1, Ordering::SeqCst);
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Template missing");
    }

    let mindmap = if id == 1 {
        json!(format!("/srv/out/maps/lesson_{}_map.pdf", id))
    } else {
        Value::Null
    };
    Json(json!({
        "title": format!("Lesson {}", id),
        "lesson_data": { "objectives": ["read", "compare"] },
        "pdf_path": format!("/srv/out/lesson_{}.pdf", id),
        "mindmap_pdf_path": mindmap,
    }))
    .into_response()
}

async fn download_pdf(Path(filename): Path<String>) -> Response {
    if !filename.starts_with("lesson") {
        return error(StatusCode::NOT_FOUND, "File not found");
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 {}", filename),
    )
        .into_response()
}

async fn get_teacher_info(State(state): State<Arc<StubState>>) -> Response {
    let info = state.teacher_info.lock().unwrap().clone();
    match info {
        Some(value) => Json(value).into_response(),
        None => (
            [(header::CONTENT_TYPE, "text/html")],
            "<html>maintenance</html>",
        )
            .into_response(),
    }
}

async fn post_teacher_info(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Response {
    if state.reject_profile_save.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "disk full");
    }
    state.saved_profiles.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({ "message": "saved" }))).into_response()
}

async fn upload(State(state): State<Arc<StubState>>, headers: HeaderMap, body: Bytes) -> Response {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);
    if !is_multipart {
        return error(StatusCode::BAD_REQUEST, "No file uploaded");
    }
    state.uploads.lock().unwrap().push(body.len());

    Json(json!({
        "title": "Uploaded lesson",
        "csv_data": { "Titre": "Les fractions", "Durée": 55 },
        "pdf_path": "/srv/out/lesson_upload.pdf",
    }))
    .into_response()
}
