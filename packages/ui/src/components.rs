//! Small presentational building blocks shared by the auth and dashboard views.

use dioxus::prelude::*;

#[component]
pub fn Spinner() -> Element {
    rsx! {
        div {
            class: "inline-block h-8 w-8 animate-spin rounded-full border-4 border-sky-200 border-t-sky-600",
            role: "status",
            aria_live: "polite",
            aria_label: "Loading",
        }
    }
}

/// Spinner centred in the viewport, shown while the session bootstraps.
#[component]
pub fn FullPageSpinner() -> Element {
    rsx! {
        div {
            class: "flex items-center justify-center min-h-screen",
            Spinner {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlertKind {
    Error,
    Success,
}

/// Banner for provider errors and success notices. Never pass tokens or secrets.
#[component]
pub fn Alert(kind: AlertKind, message: String) -> Element {
    let class = match kind {
        AlertKind::Error => {
            "px-3 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]"
        }
        AlertKind::Success => {
            "px-3 py-2.5 bg-emerald-50 border border-emerald-200 rounded text-emerald-700 text-[0.8125rem]"
        }
    };

    rsx! {
        div { class: "{class}", role: "alert", "{message}" }
    }
}
