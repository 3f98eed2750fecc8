use base64::Engine;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, LegacyLessonResult};
use crate::i18n::use_language;

/// Generate a lesson straight from a `.pptx` deck.
#[component]
pub fn UploadPanel() -> impl IntoView {
    let lang = use_language();
    let file_input: NodeRef<leptos::html::Input> = NodeRef::new();
    let (loading, set_loading) = signal(false);
    let (result, set_result) = signal::<Option<LegacyLessonResult>>(None);
    let (message, set_message) = signal::<Option<String>>(None);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let file = file_input
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            set_message.set(Some(lang.t("selectPptx").to_string()));
            return;
        };

        set_loading.set(true);
        set_message.set(None);
        spawn_local(async move {
            let name = file.name();
            let outcome = match read_file_as_base64(file).await {
                Ok(contents) => commands::generate_from_upload(name, contents).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(r) => set_result.set(Some(r)),
                Err(e) => set_message.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    let download = move |pdf_path: Option<String>| {
        spawn_local(async move {
            match commands::download_upload_pdf(pdf_path).await {
                Ok(Some(path)) => {
                    set_message.set(Some(format!("{} {}", lang.t("savedTo"), path)))
                }
                Ok(None) => {}
                Err(e) => set_message.set(Some(e)),
            }
        });
    };

    view! {
        <details class="upload-panel">
            <summary>{move || lang.t("uploadTitle")}</summary>
            <p class="section-description">{move || lang.t("uploadHint")}</p>
            <form class="input-row" on:submit=submit>
                <input type="file" accept=".pptx" node_ref=file_input />
                <button type="submit" class="btn btn-secondary" disabled=move || loading.get()>
                    {move || if loading.get() { lang.t("processing") } else { lang.t("upload") }}
                </button>
            </form>

            {move || message.get().map(|m| view! { <p class="status-text">{m}</p> })}

            {move || result.get().map(|r| {
                let preview = serde_json::to_string_pretty(&r.csv_data).unwrap_or_default();
                let pdf_path = r.pdf_path.clone();
                view! {
                    <div class="result-panel">
                        <h3 class="result-title">{r.title.clone()}</h3>
                        <pre>{preview}</pre>
                        {match pdf_path {
                            Some(path) => view! {
                                <button
                                    class="btn btn-primary"
                                    on:click=move |_| download(Some(path.clone()))
                                >
                                    {move || lang.t("downloadPdf")}
                                </button>
                            }.into_any(),
                            None => view! {
                                <p class="result-warning">{move || lang.t("pdfMissing")}</p>
                            }.into_any(),
                        }}
                    </div>
                }
            })}
        </details>
    }
}

/// Read a File as base64 string.
async fn read_file_as_base64(file: web_sys::File) -> Result<String, String> {
    use js_sys::{ArrayBuffer, Uint8Array};
    use wasm_bindgen_futures::JsFuture;

    let array_buffer: ArrayBuffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Failed to convert to ArrayBuffer")?;

    let bytes = Uint8Array::new(&array_buffer).to_vec();
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
