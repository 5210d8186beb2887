//! # Session store: process-wide authentication state
//!
//! [`SessionStore`] owns the [`AuthState`] every screen renders from and keeps it in
//! line with the identity provider.
//!
//! ## Lifecycle
//!
//! 1. [`attach`](SessionStore::attach) registers the provider listener. Every pushed
//!    event replaces user and session and clears the loading flag.
//! 2. [`initialize`](SessionStore::initialize) attaches (if needed), fetches the
//!    current session once and resolves the loading flag. A failed fetch is logged
//!    and treated as signed out.
//! 3. [`dispose`](SessionStore::dispose) (or dropping the store) releases the
//!    listener; later events no longer touch the state.
//!
//! ## Ordering
//!
//! Events are applied in delivery order, last write wins. If an event lands while
//! the bootstrap fetch is still in flight, the event is newer information and the
//! fetched result is discarded.
//!
//! State is published through a [`tokio::sync::watch`] channel so UI layers can
//! await changes instead of polling.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::events::Subscription;
use crate::provider::IdentityProvider;
use crate::state::AuthState;

struct Shared {
    state: watch::Sender<AuthState>,
    events_applied: AtomicU64,
}

/// Owned authentication state kept consistent with an [`IdentityProvider`].
pub struct SessionStore<P> {
    provider: Arc<P>,
    shared: Arc<Shared>,
    subscription: Mutex<Option<Subscription>>,
    initialized: AtomicBool,
    disposed: AtomicBool,
}

impl<P: IdentityProvider> SessionStore<P> {
    pub fn new(provider: Arc<P>) -> Self {
        let (state, _) = watch::channel(AuthState::loading());
        Self {
            provider,
            shared: Arc::new(Shared {
                state,
                events_applied: AtomicU64::new(0),
            }),
            subscription: Mutex::new(None),
            initialized: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.shared.state.subscribe()
    }

    /// Subscribe to provider auth events. Idempotent; a no-op once disposed.
    pub fn attach(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            tracing::warn!("attach called on a disposed session store");
            return;
        }
        let mut slot = self.subscription_slot();
        if slot.is_some() {
            return;
        }

        let shared = Arc::clone(&self.shared);
        *slot = Some(self.provider.on_auth_state_change(move |event, session| {
            tracing::debug!(?event, signed_in = session.is_some(), "applying auth event");
            shared.events_applied.fetch_add(1, Ordering::SeqCst);
            shared
                .state
                .send_replace(AuthState::from_session(session.cloned()));
        }));
    }

    /// Bootstrap the state from the provider's current session.
    ///
    /// Runs once per store; repeated calls return the current state untouched.
    pub async fn initialize(&self) -> AuthState {
        if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::warn!("session store already initialized");
            return self.state();
        }
        self.attach();

        let seen = self.shared.events_applied.load(Ordering::SeqCst);
        let session = match self.provider.get_session().await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "could not restore session; continuing signed out");
                None
            }
        };

        if self.disposed.load(Ordering::SeqCst) {
            return self.state();
        }
        if self.shared.events_applied.load(Ordering::SeqCst) == seen {
            self.shared
                .state
                .send_replace(AuthState::from_session(session));
        } else {
            tracing::debug!("auth event arrived during bootstrap; keeping the newer state");
        }

        let state = self.state();
        tracing::info!(
            authenticated = state.is_authenticated(),
            "session bootstrap complete"
        );
        state
    }

    /// Release the provider listener.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        if let Some(subscription) = self.subscription_slot().take() {
            subscription.unsubscribe();
            tracing::debug!("session store detached from provider events");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription_slot().is_some()
    }

    fn subscription_slot(&self) -> MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
