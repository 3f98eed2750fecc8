use leptos::prelude::*;

use crate::commands::GenerationResult;
use crate::i18n::use_language;

/// Generated lesson: title, content preview and download buttons.
#[component]
pub fn ResultPanel(
    result: GenerationResult,
    can_download_lesson: bool,
    can_download_mindmap: bool,
    on_download_lesson: impl Fn() + 'static + Copy + Send + Sync,
    on_download_mindmap: impl Fn() + 'static + Copy + Send + Sync,
) -> impl IntoView {
    let lang = use_language();
    let preview = serde_json::to_string_pretty(&result.lesson_data).unwrap_or_default();
    let has_pdf = result.pdf_path.is_some();

    view! {
        <div class="result-panel">
            <h3 class="result-title">{result.title.clone()}</h3>
            <details class="result-data">
                <summary>{move || lang.t("lessonData")}</summary>
                <pre>{preview}</pre>
            </details>
            <div class="result-actions">
                {if has_pdf {
                    view! {
                        <button
                            class="btn btn-primary"
                            disabled=!can_download_lesson
                            on:click=move |_| on_download_lesson()
                        >
                            {move || lang.t("downloadPdf")}
                        </button>
                    }.into_any()
                } else {
                    view! { <p class="result-warning">{move || lang.t("pdfMissing")}</p> }.into_any()
                }}
                <Show when=move || can_download_mindmap>
                    <button class="btn btn-secondary" on:click=move |_| on_download_mindmap()>
                        {move || lang.t("downloadMindmap")}
                    </button>
                </Show>
            </div>
        </div>
    }
}
