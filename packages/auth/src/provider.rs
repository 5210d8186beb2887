//! Identity provider capability.
//!
//! The store and gateway only ever talk to this trait, so the GoTrue client,
//! the in-memory provider used by tests, or any other backend are
//! interchangeable.

use std::future::Future;

use crate::error::AuthError;
use crate::events::Subscription;
use crate::models::{AuthEvent, Session, SignUpRequest};

/// Async interface to an external identity provider.
pub trait IdentityProvider {
    /// Current session, restored or refreshed as needed. `Ok(None)` when signed out.
    fn get_session(&self) -> impl Future<Output = Result<Option<Session>, AuthError>>;

    /// Password grant. Emits [`AuthEvent::SignedIn`] on success.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>>;

    /// Register an account. `Ok(None)` means the provider wants the email
    /// confirmed before issuing a session.
    fn sign_up(
        &self,
        request: &SignUpRequest,
    ) -> impl Future<Output = Result<Option<Session>, AuthError>>;

    /// End the session. Emits [`AuthEvent::SignedOut`] even if revocation fails.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;

    /// Register a listener for pushed auth-state changes.
    fn on_auth_state_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static;
}
