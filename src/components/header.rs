use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::i18n::use_language;

#[component]
pub fn Header() -> impl IntoView {
    let lang = use_language();
    let (switch_error, set_switch_error) = signal::<Option<String>>(None);

    let toggle = move |_| {
        spawn_local(async move {
            match commands::toggle_language().await {
                Ok(language) => {
                    set_switch_error.set(None);
                    lang.set_language.set(language);
                }
                Err(e) => set_switch_error.set(Some(e)),
            }
        });
    };

    view! {
        <header class="app-header">
            <h1 class="app-title">{move || lang.t("appTitle")}</h1>
            <nav class="nav-list">
                <a href="/" class="nav-link">{move || lang.t("navGenerator")}</a>
                <a href="/profile" class="nav-link">{move || lang.t("navProfile")}</a>
            </nav>
            <button class="btn btn-language" on:click=toggle>
                {move || lang.t("switchLanguage")}
            </button>
            {move || switch_error.get().map(|e| view! {
                <span class="header-error" title=e.clone()>"!"</span>
            })}
        </header>
    }
}
