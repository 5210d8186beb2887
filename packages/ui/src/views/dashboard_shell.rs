//! Chrome around every protected page: header with brand and user menu.

use dioxus::prelude::*;

use crate::{sign_out_detached, use_auth, use_gateway};

/// Header plus a content area for the active protected route.
#[component]
pub fn DashboardShell(children: Element) -> Element {
    rsx! {
        div {
            class: "flex flex-col min-h-screen bg-neutral-50",
            DashboardHeader {}
            main {
                class: "flex-1 w-full max-w-6xl mx-auto px-4 py-6",
                {children}
            }
        }
    }
}

#[component]
fn DashboardHeader() -> Element {
    rsx! {
        header {
            class: "sticky top-0 z-10 h-14 bg-white border-b border-neutral-200",
            div {
                class: "flex items-center justify-between h-full max-w-6xl mx-auto px-4",
                div {
                    class: "flex items-center gap-2",
                    span {
                        class: "flex items-center justify-center w-8 h-8 rounded bg-sky-700 text-white text-xs font-bold",
                        "DB"
                    }
                    span { class: "text-sm font-semibold tracking-widest text-neutral-800", "DATABANK" }
                }
                UserMenu {}
            }
        }
    }
}

/// Avatar with the user's initials and a dropdown holding the sign-out action.
#[component]
fn UserMenu() -> Element {
    let auth = use_auth();
    let gateway = use_gateway();
    let mut open = use_signal(|| false);
    let mut signing_out = use_signal(|| false);

    let state = auth();
    let Some(user) = state.user() else {
        return rsx! {};
    };
    let initials = user.initials();
    let name = user.display_name();
    let email = user.email.clone().unwrap_or_default();

    let handle_sign_out = move |_| {
        let gateway = gateway.clone();
        open.set(false);
        signing_out.set(true);
        sign_out_detached(gateway);
    };

    rsx! {
        div {
            class: "relative",
            button {
                class: "flex items-center justify-center w-9 h-9 rounded-full bg-sky-100 text-sky-800 text-sm font-semibold border-none cursor-pointer",
                r#type: "button",
                aria_label: "Open user menu",
                onclick: move |_| open.toggle(),
                "{initials}"
            }

            if open() {
                div {
                    class: "absolute right-0 mt-2 w-56 bg-white border border-neutral-200 rounded-lg shadow-lg",
                    div {
                        class: "px-4 py-3 border-b border-neutral-100",
                        p { class: "text-sm font-medium text-neutral-800 truncate", "{name}" }
                        p { class: "text-xs text-neutral-500 truncate", "{email}" }
                    }
                    button {
                        class: "w-full px-4 py-2 text-left text-sm text-red-600 bg-transparent border-none cursor-pointer hover:bg-neutral-50 disabled:opacity-50",
                        r#type: "button",
                        disabled: signing_out(),
                        onclick: handle_sign_out,
                        if signing_out() { "Signing out..." } else { "Sign out" }
                    }
                }
            }
        }
    }
}
