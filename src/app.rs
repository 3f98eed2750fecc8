use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use wasm_bindgen_futures::spawn_local;

use crate::commands;
use crate::components::header::Header;
use crate::i18n::{apply_language, Language, LanguageContext};
use crate::pages::generator::GeneratorPage;
use crate::pages::profile::ProfilePage;

#[component]
pub fn App() -> impl IntoView {
    let (language, set_language) = signal(Language::default());
    provide_context(LanguageContext {
        language,
        set_language,
    });

    // Load saved language on mount
    Effect::new(move |_| {
        spawn_local(async move {
            if let Ok(saved) = commands::get_language().await {
                set_language.set(saved);
            }
        });
    });

    // Flip the document direction whenever the language changes
    Effect::new(move |_| {
        apply_language(language.get());
    });

    view! {
        <Router>
            <div class="app-layout">
                <Header />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=GeneratorPage />
                        <Route path=path!("/profile") view=ProfilePage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
