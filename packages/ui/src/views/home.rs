use dioxus::prelude::*;

use crate::use_auth;

/// Dashboard landing panel.
#[component]
pub fn HomeView() -> Element {
    let auth = use_auth();
    let name = auth()
        .user()
        .map(|user| user.display_name())
        .unwrap_or_default();

    rsx! {
        section {
            class: "p-6 bg-white border border-neutral-200 rounded-lg",
            h2 { class: "text-xl font-semibold text-neutral-800", "Welcome back, {name}" }
            p {
                class: "mt-2 text-sm text-neutral-500",
                "You are signed in. Your dashboard content will appear here."
            }
        }
    }
}
