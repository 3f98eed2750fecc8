use leptos::prelude::*;

use crate::commands::CascadeLevel;
use crate::i18n::use_language;

/// One of the five dependent dropdowns.
///
/// Picking the placeholder sends `None`, which clears this level and every
/// level below it.
#[component]
pub fn CascadeSelect(
    level: CascadeLevel,
    options: Signal<Vec<String>>,
    value: Signal<Option<String>>,
    disabled: Signal<bool>,
    on_select: impl Fn(Option<String>) + 'static + Copy + Send + Sync,
) -> impl IntoView {
    let lang = use_language();
    let id = format!("select-{}", level.label_key());

    view! {
        <div class="form-group">
            <label for=id.clone()>{move || lang.t(level.label_key())}</label>
            <select
                id=id
                class="input"
                disabled=move || disabled.get() || options.get().is_empty()
                prop:value=move || value.get().unwrap_or_default()
                on:change=move |ev| {
                    let picked = event_target_value(&ev);
                    on_select((!picked.is_empty()).then_some(picked));
                }
            >
                <option value="">{move || lang.t("choose")}</option>
                {move || options.get().into_iter().map(|o| {
                    let val = o.clone();
                    view! { <option value={val}>{o}</option> }
                }).collect::<Vec<_>>()}
            </select>
        </div>
    }
}
