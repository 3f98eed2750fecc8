mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{spawn_backend, CATALOG_ERROR};
use lessonkit_tauri::api::ArtifactKind;
use lessonkit_tauri::catalog::{CascadeLevel, Resolution};
use lessonkit_tauri::workflow::{ErrorKind, GeneratorSession, Phase, Progress, ViewToken};
use lessonkit_tauri::LessonKitError;

async fn ready_session(backend: &common::StubBackend) -> (GeneratorSession, ViewToken) {
    let session = GeneratorSession::new(backend.client());
    let token = session.open().unwrap().view.unwrap();
    let snapshot = session.load_catalog(token).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Ready);
    (session, token)
}

fn choose(session: &GeneratorSession, token: ViewToken, values: [&str; 5]) {
    for (level, value) in CascadeLevel::ALL.into_iter().zip(values) {
        session.select(token, level, Some(value.to_string())).unwrap();
    }
}

#[tokio::test]
async fn test_catalog_drives_the_dropdowns() {
    let backend = spawn_backend().await;
    let (session, token) = ready_session(&backend).await;

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.catalog_size, 7);
    assert_eq!(snapshot.options.subjects, vec!["Math", "Physique", "SVT"]);
    assert!(snapshot.options.levels.is_empty());

    let snapshot = session
        .select(token, CascadeLevel::Subject, Some("Math".into()))
        .unwrap();
    assert_eq!(snapshot.options.levels, vec!["1AC", "2AC"]);

    choose(&session, token, ["Math", "1AC", "P1", "S1", "2"]);
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.options.sessions, vec!["1", "2", "10"]);
    assert_eq!(snapshot.resolution.record().map(|r| r.id), Some(2));
    assert!(snapshot.can_generate);

    let snapshot = session
        .select(token, CascadeLevel::Level, Some("2AC".into()))
        .unwrap();
    assert_eq!(snapshot.selection.period, None);
    assert_eq!(snapshot.resolution, Resolution::Incomplete);
    assert!(!snapshot.can_generate);
}

#[tokio::test]
async fn test_catalog_failure_leaves_empty_catalog() {
    let backend = spawn_backend().await;
    backend.state.catalog_mode.store(CATALOG_ERROR, Ordering::SeqCst);

    let session = GeneratorSession::new(backend.client());
    let token = session.open().unwrap().view.unwrap();
    let snapshot = session.load_catalog(token).await.unwrap();

    assert_eq!(snapshot.catalog_size, 0);
    let error = snapshot.error.unwrap();
    assert_eq!(error.kind, ErrorKind::CatalogLoad);
    assert!(error.message.contains("database offline"));
    assert_eq!(error.hint.as_deref(), Some("checkBackend"));
}

#[tokio::test]
async fn test_generate_and_download_both_files() {
    let backend = spawn_backend().await;
    let (session, token) = ready_session(&backend).await;
    choose(&session, token, ["Math", "1AC", "P1", "S1", "1"]);

    let snapshot = session.generate(token).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Succeeded);
    assert_eq!(snapshot.progress, None);
    assert!(snapshot.can_download_lesson);
    assert!(snapshot.can_download_mindmap);
    assert_eq!(snapshot.result.unwrap().title, "Lesson 1");

    let dir = tempfile::tempdir().unwrap();
    let lesson = session
        .download(token, ArtifactKind::Lesson, dir.path())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lesson, dir.path().join("lesson_1.pdf"));
    assert_eq!(std::fs::read(&lesson).unwrap(), b"%PDF-1.4 lesson_1.pdf");

    let mindmap = session
        .download(token, ArtifactKind::Mindmap, dir.path())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mindmap.file_name().unwrap(), "lesson_1_map.pdf");
}

#[tokio::test]
async fn test_download_without_mindmap_is_a_no_op() {
    let backend = spawn_backend().await;
    let (session, token) = ready_session(&backend).await;
    choose(&session, token, ["Math", "1AC", "P1", "S1", "10"]);
    session.generate(token).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let saved = session
        .download(token, ArtifactKind::Mindmap, dir.path())
        .await
        .unwrap();
    assert_eq!(saved, None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_before_generation_is_rejected() {
    let backend = spawn_backend().await;
    let (session, token) = ready_session(&backend).await;
    let dir = tempfile::tempdir().unwrap();

    let err = session
        .download(token, ArtifactKind::Lesson, dir.path())
        .await
        .unwrap_err();
    assert!(matches!(err, LessonKitError::Precondition(_)));
}

#[tokio::test]
async fn test_failed_generation_retries_same_lesson() {
    let backend = spawn_backend().await;
    backend.state.failing_generations.store(1, Ordering::SeqCst);
    let (session, token) = ready_session(&backend).await;
    choose(&session, token, ["Math", "1AC", "P1", "S1", "2"]);

    let snapshot = session.generate(token).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.progress, None);
    assert_eq!(snapshot.error.as_ref().unwrap().message, "Template missing");
    assert!(snapshot.can_retry);
    assert_eq!(snapshot.selection.session.as_deref(), Some("2"));
    assert_eq!(snapshot.catalog_size, 7);

    let snapshot = session.retry(token).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Succeeded);
    assert_eq!(snapshot.result.unwrap().title, "Lesson 2");
    assert_eq!(snapshot.error, None);
    assert_eq!(backend.generate_calls(), 2);
}

#[tokio::test]
async fn test_incomplete_or_ambiguous_selection_never_reaches_backend() {
    let backend = spawn_backend().await;
    let (session, token) = ready_session(&backend).await;

    assert!(session.generate(token).await.is_err());

    choose(&session, token, ["Physique", "3AC", "P1", "S2", "1"]);
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.resolution, Resolution::Ambiguous { ids: vec![6, 7] });
    assert!(!snapshot.can_generate);
    assert!(session.generate(token).await.is_err());

    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn test_only_one_generation_in_flight() {
    let backend = spawn_backend().await;
    backend.state.generation_delay_ms.store(300, Ordering::SeqCst);
    let (session, token) = ready_session(&backend).await;
    let session = Arc::new(session);
    choose(&session, token, ["SVT", "1AC", "P1", "S1", "1"]);

    let running = {
        let session = session.clone();
        tokio::spawn(async move { session.generate(token).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.phase, Phase::Generating);
    assert_eq!(snapshot.progress, Some(Progress::Analyzing));
    assert!(!snapshot.can_generate);
    assert!(session.generate(token).await.is_err());

    let snapshot = running.await.unwrap().unwrap();
    assert_eq!(snapshot.phase, Phase::Succeeded);
    assert_eq!(backend.generate_calls(), 1);
}

#[tokio::test]
async fn test_closing_the_view_discards_the_response() {
    let backend = spawn_backend().await;
    backend.state.generation_delay_ms.store(300, Ordering::SeqCst);
    let (session, token) = ready_session(&backend).await;
    let session = Arc::new(session);
    choose(&session, token, ["Math", "2AC", "P2", "S3", "1"]);

    let running = {
        let session = session.clone();
        tokio::spawn(async move { session.generate(token).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(session.close(token).unwrap());
    let reopened = session.open().unwrap().view.unwrap();
    assert_ne!(reopened, token);

    let outcome = running.await.unwrap();
    assert!(matches!(outcome, Err(LessonKitError::StaleView)));

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.view, Some(reopened));
    assert_eq!(snapshot.phase, Phase::LoadingCatalog);
    assert_eq!(snapshot.result, None);
}

#[tokio::test]
async fn test_catalog_loads_once_per_view() {
    let backend = spawn_backend().await;
    let (session, token) = ready_session(&backend).await;
    assert!(session.load_catalog(token).await.is_err());
}

#[tokio::test]
async fn test_upload_pdf_is_saved_without_a_view() {
    let backend = spawn_backend().await;
    let session = GeneratorSession::new(backend.client());
    let dir = tempfile::tempdir().unwrap();

    let saved = session
        .download_upload_pdf(Some("/srv/out/lesson_upload.pdf"), dir.path())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved, dir.path().join("lesson_upload.pdf"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.4 lesson_upload.pdf");

    assert_eq!(session.download_upload_pdf(None, dir.path()).await.unwrap(), None);
    assert_eq!(
        session.download_upload_pdf(Some("/srv/out/"), dir.path()).await.unwrap(),
        None
    );
}
