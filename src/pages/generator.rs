use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{
    self, ArtifactKind, CascadeLevel, ErrorKind, Phase, Progress, Resolution, WorkflowSnapshot,
};
use crate::components::cascade_select::CascadeSelect;
use crate::components::result_panel::ResultPanel;
use crate::components::status_badge::{BadgeStatus, StatusBadge};
use crate::components::upload_panel::UploadPanel;
use crate::i18n::use_language;

/// Token of the backend view this page owns. Zero means "not opened yet".
#[derive(Clone, Default)]
struct ViewHandle {
    token: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
}

impl ViewHandle {
    fn token(&self) -> Option<u64> {
        match self.token.load(Ordering::SeqCst) {
            0 => None,
            t => Some(t),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[component]
pub fn GeneratorPage() -> impl IntoView {
    let lang = use_language();
    let view_handle = ViewHandle::default();

    let (snapshot, set_snapshot) = signal::<Option<WorkflowSnapshot>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    // Open a backend view and load the catalog once per page visit
    {
        let handle = view_handle.clone();
        spawn_local(async move {
            let opened = match commands::open_generator().await {
                Ok(s) => s,
                Err(e) => {
                    set_notice.set(Some(e));
                    return;
                }
            };
            let Some(token) = opened.view else { return };
            if handle.is_closed() {
                let _ = commands::close_generator(token).await;
                return;
            }
            handle.token.store(token, Ordering::SeqCst);
            set_snapshot.set(Some(opened));

            let loaded = commands::load_catalog(token).await;
            if handle.is_closed() {
                return;
            }
            match loaded {
                Ok(s) => set_snapshot.set(Some(s)),
                Err(e) => set_notice.set(Some(e)),
            }
        });
    }

    {
        let handle = view_handle.clone();
        on_cleanup(move || {
            handle.closed.store(true, Ordering::SeqCst);
            if let Some(token) = handle.token() {
                spawn_local(async move {
                    let _ = commands::close_generator(token).await;
                });
            }
        });
    }

    // Poll the progress label while a generation is running
    {
        let handle = view_handle.clone();
        Effect::new(move |_| {
            if !busy.get() {
                return;
            }
            let handle = handle.clone();
            let callback = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
                let handle = handle.clone();
                spawn_local(async move {
                    let Ok(s) = commands::generation_snapshot().await else { return };
                    if !handle.is_closed()
                        && s.view.is_some()
                        && s.view == handle.token()
                        && s.phase == Phase::Generating
                    {
                        set_snapshot.set(Some(s));
                    }
                });
            }) as Box<dyn Fn()>);

            let interval_id = web_sys::window()
                .and_then(|w| {
                    w.set_interval_with_callback_and_timeout_and_arguments_0(
                        callback.as_ref().unchecked_ref(),
                        400,
                    )
                    .ok()
                });
            callback.forget();

            on_cleanup(move || {
                if let (Some(window), Some(id)) = (web_sys::window(), interval_id) {
                    window.clear_interval_with_handle(id);
                }
            });
        });
    }

    let select = {
        let handle = view_handle.clone();
        move |level: CascadeLevel, value: Option<String>| {
            let Some(token) = handle.token() else { return };
            spawn_local(async move {
                match commands::select_filter(token, level, value).await {
                    Ok(s) => {
                        set_notice.set(None);
                        set_snapshot.set(Some(s));
                    }
                    Err(e) => set_notice.set(Some(e)),
                }
            });
        }
    };
    let select = StoredValue::new(select);

    let run_generation = {
        let handle = view_handle.clone();
        move |retry: bool| {
            let Some(token) = handle.token() else { return };
            set_busy.set(true);
            set_notice.set(None);
            let handle = handle.clone();
            spawn_local(async move {
                let outcome = if retry {
                    commands::retry_generation(token).await
                } else {
                    commands::generate_lesson(token).await
                };
                if handle.is_closed() {
                    return;
                }
                match outcome {
                    Ok(s) => set_snapshot.set(Some(s)),
                    Err(e) => set_notice.set(Some(e)),
                }
                set_busy.set(false);
            });
        }
    };
    let run_generation = StoredValue::new(run_generation);

    let download = {
        let handle = view_handle.clone();
        move |kind: ArtifactKind| {
            let Some(token) = handle.token() else { return };
            spawn_local(async move {
                match commands::download_artifact(token, kind).await {
                    Ok(Some(path)) => {
                        set_notice.set(Some(format!("{} {}", lang.t("savedTo"), path)))
                    }
                    Ok(None) => {}
                    Err(e) => set_notice.set(Some(e)),
                }
            });
        }
    };
    let download = StoredValue::new(download);

    let phase = move || snapshot.get().map(|s| s.phase).unwrap_or(Phase::Idle);
    let locked = Signal::derive(move || busy.get() || !phase_accepts_selection(phase()));

    view! {
        <div class="page generator-page">
            <h2>{move || lang.t("generatorTitle")}</h2>

            // Catalog banner
            {move || match phase() {
                Phase::Idle | Phase::LoadingCatalog => Some(view! {
                    <div class="loading-spinner">
                        <div class="spinner"></div>
                        <span>{lang.t("loadingLessons")}</span>
                    </div>
                }.into_any()),
                _ => snapshot.get()
                    .and_then(|s| s.error)
                    .filter(|e| e.kind == ErrorKind::CatalogLoad)
                    .map(|e| view! {
                        <div class="banner banner-error">
                            <strong>{lang.t("loadError")}</strong>
                            <span>{e.message}</span>
                            <span>{e.hint.map(|h| lang.t(hint_key(&h)))}</span>
                        </div>
                    }.into_any()),
            }}

            <div class="cascade">
                {CascadeLevel::ALL.into_iter().map(|level| {
                    let options = Signal::derive(move || {
                        snapshot.get()
                            .map(|s| s.options.for_level(level).to_vec())
                            .unwrap_or_default()
                    });
                    let value = Signal::derive(move || {
                        snapshot.get().and_then(|s| s.selection.get(level).map(str::to_string))
                    });
                    view! {
                        <CascadeSelect
                            level=level
                            options=options
                            value=value
                            disabled=locked
                            on_select=move |v| select.with_value(|f| f(level, v))
                        />
                    }
                }).collect::<Vec<_>>()}
            </div>

            // Resolved lesson and the generate button
            {move || snapshot.get().map(|s| {
                let summary = match &s.resolution {
                    Resolution::Resolved { record } => Some(format!("{}: {}", lang.t("selectedLesson"), record.title)),
                    Resolution::NotFound => Some(lang.t("noMatch").to_string()),
                    Resolution::Ambiguous { .. } => Some(lang.t("ambiguous").to_string()),
                    Resolution::Incomplete => None,
                };
                let empty_catalog = s.phase == Phase::Ready && s.catalog_size == 0 && s.error.is_none();
                let can_generate = s.can_generate;
                view! {
                    <div class="generate-row">
                        {summary.map(|text| view! { <p class="selection-summary">{text}</p> })}
                        {empty_catalog.then(|| view! { <p class="section-description">{lang.t("noLessons")}</p> })}
                        <button
                            class="btn btn-primary"
                            disabled=move || busy.get() || !can_generate
                            on:click=move |_| run_generation.with_value(|f| f(false))
                        >
                            {lang.t("generate")}
                        </button>
                    </div>
                }
            })}

            // Progress
            <Show when=move || busy.get()>
                {move || {
                    let progress = snapshot.get()
                        .and_then(|s| s.progress)
                        .unwrap_or(Progress::Analyzing);
                    view! {
                        <StatusBadge label=lang.t(progress.label_key()) status=BadgeStatus::Working />
                    }
                }}
            </Show>

            // Generation failure with retry
            {move || snapshot.get()
                .filter(|s| s.phase == Phase::Failed)
                .map(|s| {
                    let message = s.error.map(|e| e.message).unwrap_or_default();
                    let can_retry = s.can_retry;
                    view! {
                        <div class="generation-error">
                            <StatusBadge
                                label=lang.t("generationFailed")
                                status=BadgeStatus::Failed
                                detail=message
                            />
                            <button
                                class="btn btn-secondary"
                                disabled=move || busy.get() || !can_retry
                                on:click=move |_| run_generation.with_value(|f| f(true))
                            >
                                {lang.t("retry")}
                            </button>
                        </div>
                    }
                })}

            // Result
            {move || snapshot.get()
                .filter(|s| s.phase == Phase::Succeeded)
                .and_then(|s| {
                    let (lesson, mindmap) = (s.can_download_lesson, s.can_download_mindmap);
                    s.result.map(|result| view! {
                        <ResultPanel
                            result=result
                            can_download_lesson=lesson
                            can_download_mindmap=mindmap
                            on_download_lesson=move || download.with_value(|f| f(ArtifactKind::Lesson))
                            on_download_mindmap=move || download.with_value(|f| f(ArtifactKind::Mindmap))
                        />
                    })
                })}

            {move || notice.get().map(|n| view! { <p class="status-text">{n}</p> })}

            <UploadPanel />
        </div>
    }
}

fn phase_accepts_selection(phase: Phase) -> bool {
    matches!(phase, Phase::Ready | Phase::Succeeded | Phase::Failed)
}

/// Translation key for a hint sent by the backend.
fn hint_key(hint: &str) -> &'static str {
    match hint {
        "checkBackend" => "checkBackend",
        _ => "",
    }
}
