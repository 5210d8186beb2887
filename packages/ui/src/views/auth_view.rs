use auth::HOME_ROUTE;
use dioxus::prelude::*;

use super::AuthForm;
use crate::components::FullPageSpinner;
use crate::use_auth;

/// Public sign-in screen. Signed-in users are sent straight to the dashboard.
#[component]
pub fn AuthView() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if auth().user().is_some() {
            nav.replace(HOME_ROUTE.to_string());
        }
    });

    if auth().is_loading() {
        return rsx! { FullPageSpinner {} };
    }

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen px-4 py-12 bg-neutral-50",

            div {
                class: "mb-8 text-center",
                h1 { class: "text-3xl font-bold text-neutral-800", "Databank" }
                p { class: "mt-2 text-[0.9375rem] text-neutral-500", "Sign in to access your dashboard" }
            }

            AuthForm {}
        }
    }
}
