use dioxus::prelude::*;

use ui::AuthProvider;
use views::{Auth, Home, NotFound, ProtectedLayout};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/auth")]
    Auth {},
    #[layout(ProtectedLayout)]
        #[route("/")]
        Home {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!("starting databank");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: TAILWIND_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}
