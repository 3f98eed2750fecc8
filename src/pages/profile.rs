use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, ProfileField, SaveOutcome, TeacherProfile};
use crate::i18n::{use_language, Language};

const PER_LANGUAGE: [ProfileField; 3] = [ProfileField::Name, ProfileField::School, ProfileField::Level];
const SHARED: [ProfileField; 2] = [ProfileField::Ppr, ProfileField::SchoolYear];

#[component]
pub fn ProfilePage() -> impl IntoView {
    let lang = use_language();
    let (profile, set_profile) = signal(TeacherProfile::default());
    let (saving, set_saving) = signal(false);
    let (outcome, set_outcome) = signal::<Option<SaveOutcome>>(None);
    let (edit_error, set_edit_error) = signal::<Option<String>>(None);

    // Load the stored profile on mount
    Effect::new(move |_| {
        spawn_local(async move {
            match commands::load_teacher_profile().await {
                Ok(p) => set_profile.set(p),
                Err(e) => set_edit_error.set(Some(e)),
            }
        });
    });

    let edit = move |language: Language, field: ProfileField, value: String| {
        // Update the form right away; the backend keeps the draft used on save
        set_profile.update(|p| set_local(p, language, field, &value));
        spawn_local(async move {
            if let Err(e) = commands::update_profile_field(language, field, value).await {
                set_edit_error.set(Some(e));
            }
        });
    };

    let save = move |_| {
        set_saving.set(true);
        set_outcome.set(None);
        spawn_local(async move {
            match commands::save_teacher_profile().await {
                Ok(o) => set_outcome.set(Some(o)),
                Err(e) => set_edit_error.set(Some(e)),
            }
            set_saving.set(false);
        });
    };

    let field_input = move |language: Language, field: ProfileField| {
        let id = format!("{}-{}", language.code(), field.label_key());
        view! {
            <div class="form-group">
                <label for=id.clone()>{move || lang.t(field.label_key())}</label>
                <input
                    id=id
                    type="text"
                    class="input"
                    dir=language.dir()
                    prop:value=move || profile.get().get(language, field)
                    on:input=move |ev| edit(language, field, event_target_value(&ev))
                />
            </div>
        }
    };

    view! {
        <div class="page profile-page">
            <h2>{move || lang.t("profileTitle")}</h2>

            <section class="settings-section" dir="ltr">
                <h3>{move || lang.t("frenchSection")}</h3>
                {PER_LANGUAGE.into_iter().map(|f| field_input(Language::Fr, f)).collect::<Vec<_>>()}
            </section>

            <section class="settings-section" dir="rtl">
                <h3>{move || lang.t("arabicSection")}</h3>
                {PER_LANGUAGE.into_iter().map(|f| field_input(Language::Ar, f)).collect::<Vec<_>>()}
            </section>

            <section class="settings-section">
                <h3>{move || lang.t("sharedSection")}</h3>
                {SHARED.into_iter().map(|f| field_input(Language::Fr, f)).collect::<Vec<_>>()}
            </section>

            <button class="btn btn-save" on:click=save disabled=move || saving.get()>
                {move || if saving.get() { lang.t("saving") } else { lang.t("save") }}
            </button>

            {move || outcome.get().map(|o| {
                let class = if matches!(o, SaveOutcome::Saved) { "status-text status-ok" } else { "status-text status-error" };
                view! { <p class=class>{lang.t(o.message_key())}</p> }
            })}
            {move || edit_error.get().map(|e| view! { <p class="status-text status-error">{e}</p> })}
        </div>
    }
}

/// Mirror of the backend edit rule: PPR and school year live in both blocks.
fn set_local(profile: &mut TeacherProfile, language: Language, field: ProfileField, value: &str) {
    let targets = match field {
        ProfileField::Ppr | ProfileField::SchoolYear => vec![Language::Fr, Language::Ar],
        _ => vec![language],
    };
    for target in targets {
        let block = match target {
            Language::Fr => &mut profile.fr,
            Language::Ar => &mut profile.ar,
        };
        block.insert(
            field.key(target).to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }
}
