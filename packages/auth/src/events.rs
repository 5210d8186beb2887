//! # Auth-state change listeners
//!
//! [`AuthEventHub`] is the registry providers use to implement
//! `on_auth_state_change`. Subscribing returns a [`Subscription`] guard; the
//! listener stays registered exactly as long as the guard is alive.
//!
//! Listeners are invoked outside the registry lock, so a listener may subscribe
//! or drop subscriptions without deadlocking.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::models::{AuthEvent, Session};

type Listener = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared listener registry for provider-pushed auth events.
#[derive(Clone, Default)]
pub struct AuthEventHub {
    registry: Arc<Mutex<Registry>>,
}

impl AuthEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it is removed when the returned guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver an event to every live listener in subscription order.
    pub fn emit(&self, event: AuthEvent, session: Option<&Session>) {
        let listeners: Vec<Listener> = lock(&self.registry)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(?event, listeners = listeners.len(), "emitting auth event");
        for listener in listeners {
            listener(event, session);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

impl fmt::Debug for AuthEventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Guard for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Explicitly release the listener.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(hub: &AuthEventHub) -> (Arc<AtomicUsize>, Subscription) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let sub = hub.subscribe(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (hits, sub)
    }

    #[test]
    fn emit_reaches_every_listener() {
        let hub = AuthEventHub::new();
        let (a, _sub_a) = counter(&hub);
        let (b, _sub_b) = counter(&hub);

        hub.emit(AuthEvent::SignedOut, None);

        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let hub = AuthEventHub::new();
        let (hits, sub) = counter(&hub);
        assert_eq!(hub.listener_count(), 1);

        sub.unsubscribe();
        hub.emit(AuthEvent::SignedOut, None);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = AuthEventHub::new();
        let (_hits, sub) = counter(&hub);
        drop(hub);
        drop(sub);
    }

    #[test]
    fn listener_can_drop_its_own_subscription() {
        let hub = AuthEventHub::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let sub = hub.subscribe(move |_, _| {
            drop(inner.lock().unwrap().take());
        });
        *slot.lock().unwrap() = Some(sub);

        hub.emit(AuthEvent::SignedIn, None);
        assert_eq!(hub.listener_count(), 0);
    }
}
