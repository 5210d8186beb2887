//! Authentication context and hooks for the UI.

use std::rc::Rc;
use std::sync::Arc;

use auth::{
    AuthGateway, AuthState, IdentityProvider, ProviderConfig, SessionStore, SupabaseProvider,
};
use dioxus::prelude::*;

/// Gateway handed to forms and menus.
pub type Gateway = AuthGateway<SupabaseProvider, RouterNavigator>;

/// Adapts the Dioxus router to the gateway's navigation capability.
#[derive(Clone, Copy)]
pub struct RouterNavigator(Navigator);

impl auth::Navigator for RouterNavigator {
    fn navigate(&self, path: &str) {
        if let Some(failure) = self.0.push(path.to_string()) {
            tracing::warn!(?failure, path, "navigation failed");
        }
    }
}

/// Get the current authentication state.
/// Returns a signal that updates whenever the session store changes.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Build a gateway bound to the shared provider and the current router.
/// Must be called below both `AuthProvider` and `Router`.
pub fn use_gateway() -> Gateway {
    let provider = use_context::<Arc<SupabaseProvider>>();
    let navigator = RouterNavigator(use_navigator());
    AuthGateway::new(provider, navigator)
}

/// Sign out on the root scope.
///
/// The caller usually unmounts as soon as the signed-out state lands, before the
/// revoke request finishes; a task owned by the caller would be cancelled there.
pub fn sign_out_detached<P, N>(gateway: AuthGateway<P, N>)
where
    P: IdentityProvider + 'static,
    N: auth::Navigator + 'static,
{
    spawn_forever(async move {
        gateway.sign_out().await;
    });
}

/// Provider component that owns the session store.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let provider = use_hook(|| Arc::new(build_provider()));
    let store = use_hook(|| Rc::new(SessionStore::new(Arc::clone(&provider))));
    let mut auth_state = use_signal(AuthState::loading);

    use_context_provider(|| auth_state);
    use_context_provider(|| provider);

    // Bootstrap once, then mirror every store change into the signal
    let bootstrap = Rc::clone(&store);
    use_future(move || {
        let store = Rc::clone(&bootstrap);
        async move {
            let mut changes = store.watch();
            store.initialize().await;
            auth_state.set(store.state());
            while changes.changed().await.is_ok() {
                let next = changes.borrow_and_update().clone();
                auth_state.set(next);
            }
        }
    });

    use_drop(move || store.dispose());

    rsx! {
        {children}
    }
}

fn build_provider() -> SupabaseProvider {
    SupabaseProvider::new(provider_config(), session_storage())
}

#[cfg(target_arch = "wasm32")]
fn provider_config() -> ProviderConfig {
    ProviderConfig::from_build_env()
}

#[cfg(not(target_arch = "wasm32"))]
fn provider_config() -> ProviderConfig {
    ProviderConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "using build-time identity provider settings");
        ProviderConfig::from_build_env()
    })
}

#[cfg(target_arch = "wasm32")]
fn session_storage() -> auth::LocalSessionStorage {
    auth::LocalSessionStorage
}

#[cfg(not(target_arch = "wasm32"))]
fn session_storage() -> auth::FileSessionStorage {
    let dir = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("databank");
    auth::FileSessionStorage::in_dir(dir)
}
