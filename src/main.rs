mod app;
mod commands;
mod components;
mod i18n;
mod pages;

use app::App;

fn main() {
    leptos::mount::mount_to_body(App);
}
