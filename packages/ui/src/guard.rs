use auth::AUTH_ROUTE;
use dioxus::prelude::*;

use crate::components::FullPageSpinner;
use crate::use_auth;

/// Route guard: renders children only for a signed-in user.
///
/// Shows a spinner while the session bootstraps and sends everyone else to the
/// sign-in screen. UX only; the identity provider enforces real access control.
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        let state = auth();
        if !state.is_loading() && !state.is_authenticated() {
            nav.replace(AUTH_ROUTE.to_string());
        }
    });

    let state = auth();
    if state.is_loading() {
        return rsx! { FullPageSpinner {} };
    }
    if !state.is_authenticated() {
        return rsx! {};
    }

    rsx! {
        {children}
    }
}
