use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStatus {
    Working,
    Failed,
}

#[component]
pub fn StatusBadge(
    /// The label text, e.g. "Analyzing content..."
    #[prop(into)]
    label: String,
    status: BadgeStatus,
    /// Optional detail text, e.g. the backend's error message
    #[prop(optional, into)]
    detail: Option<String>,
) -> impl IntoView {
    let (icon, class) = match status {
        BadgeStatus::Working => ("\u{2026}", "status-badge status-working"),
        BadgeStatus::Failed => ("\u{2717}", "status-badge status-fail"),
    };

    view! {
        <div class="status-item">
            <span class=class>{icon}</span>
            <span class="status-label">{label}</span>
            <span class="status-detail">{detail.unwrap_or_default()}</span>
        </div>
    }
}
