use dioxus::prelude::*;
use ui::{AuthView, DashboardShell, HomeView, RequireAuth};

use crate::Route;

#[component]
pub fn Auth() -> Element {
    rsx! { AuthView {} }
}

/// Every route nested under this layout requires a signed-in user.
#[component]
pub fn ProtectedLayout() -> Element {
    rsx! {
        RequireAuth {
            DashboardShell {
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { HomeView {} }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen gap-3",
            h1 { class: "text-2xl font-semibold text-neutral-800", "Page not found" }
            p { class: "text-sm text-neutral-500", "Nothing lives at /{path}." }
            Link { class: "text-sm text-sky-700 hover:underline", to: Route::Home {}, "Back to dashboard" }
        }
    }
}
