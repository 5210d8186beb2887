//! End-to-end behaviour of the store and gateway against the in-memory provider.

use std::sync::{Arc, Mutex};

use auth::{
    AuthEvent, AuthGateway, MemoryProvider, Navigator, SessionStore, AUTH_ROUTE, HOME_ROUTE,
};

#[derive(Clone, Default)]
struct RecordingNavigator(Arc<Mutex<Vec<String>>>);

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.0.lock().unwrap().push(path.to_string());
    }
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct Harness {
    provider: Arc<MemoryProvider>,
    store: SessionStore<MemoryProvider>,
    gateway: AuthGateway<MemoryProvider, RecordingNavigator>,
    nav: RecordingNavigator,
}

fn harness(provider: MemoryProvider) -> Harness {
    let provider = Arc::new(provider);
    let nav = RecordingNavigator::default();
    Harness {
        store: SessionStore::new(Arc::clone(&provider)),
        gateway: AuthGateway::new(Arc::clone(&provider), nav.clone()),
        provider,
        nav,
    }
}

fn with_user() -> MemoryProvider {
    MemoryProvider::new().with_account("user@example.com", "correct-horse", "Una", "Sers")
}

#[tokio::test]
async fn loading_resolves_once_and_never_reverts() {
    let h = harness(with_user());
    let mut changes = h.store.watch();
    assert!(h.store.state().is_loading());

    h.store.initialize().await;
    assert!(!changes.borrow_and_update().is_loading());

    h.gateway.sign_in("user@example.com", "correct-horse").await.unwrap();
    assert!(!changes.borrow_and_update().is_loading());
    h.gateway.sign_out().await;
    assert!(!changes.borrow_and_update().is_loading());
    h.provider.push_event(AuthEvent::TokenRefreshed, None);
    assert!(!h.store.state().is_loading());
}

#[tokio::test]
async fn no_provider_session_means_signed_out() {
    let h = harness(MemoryProvider::new());
    let state = h.store.initialize().await;
    assert!(state.user().is_none());
    assert!(state.session().is_none());
}

#[tokio::test]
async fn valid_sign_in_updates_store_through_event_and_navigates_home_once() {
    let h = harness(with_user());
    h.store.initialize().await;

    let session = h
        .gateway
        .sign_in("user@example.com", "correct-horse")
        .await
        .unwrap()
        .unwrap();

    let state = h.store.state();
    assert_eq!(state.session(), Some(&session));
    assert_eq!(
        state.user().and_then(|u| u.email.as_deref()),
        Some("user@example.com")
    );
    assert_eq!(h.nav.visits(), vec![HOME_ROUTE]);
}

#[tokio::test]
async fn invalid_sign_in_returns_message_without_navigation() {
    let h = harness(with_user());
    h.store.initialize().await;

    let err = h
        .gateway
        .sign_in("user@example.com", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(h.nav.visits().is_empty());
    assert!(!h.store.state().is_authenticated());
}

#[tokio::test]
async fn sign_out_navigates_to_auth_regardless_of_state() {
    let h = harness(MemoryProvider::new());
    h.store.initialize().await;

    h.gateway.sign_out().await;
    assert_eq!(h.nav.visits(), vec![AUTH_ROUTE]);
}

#[tokio::test]
async fn disposed_store_ignores_pushed_events() {
    let h = harness(with_user());
    let before = h.store.initialize().await;
    h.store.dispose();

    let elsewhere = h.provider.session_for("user@example.com");
    h.provider.push_event(AuthEvent::SignedIn, Some(elsewhere));

    assert_eq!(h.store.state(), before);
    assert_eq!(h.provider.listener_count(), 0);
}

#[tokio::test]
async fn restored_session_then_sign_out() {
    let seed = with_user();
    let token = seed.session_for("user@example.com");
    let h = harness(seed.with_session(token.clone()));

    let state = h.store.initialize().await;
    assert!(!state.is_loading());
    assert_eq!(state.session(), Some(&token));
    assert_eq!(
        state.user().and_then(|u| u.email.as_deref()),
        Some("user@example.com")
    );

    h.gateway.sign_out().await;

    let state = h.store.state();
    assert!(!state.is_loading());
    assert!(state.user().is_none());
    assert!(state.session().is_none());
    assert_eq!(h.nav.visits(), vec![AUTH_ROUTE]);
}

#[tokio::test]
async fn sign_in_elsewhere_is_picked_up() {
    let h = harness(with_user());
    h.store.initialize().await;

    let pushed = h.provider.session_for("user@example.com");
    h.provider.push_event(AuthEvent::SignedIn, Some(pushed.clone()));
    assert_eq!(h.store.state().session(), Some(&pushed));

    h.provider.push_event(AuthEvent::SignedOut, None);
    assert!(!h.store.state().is_authenticated());
    assert!(h.nav.visits().is_empty());
}
