use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::AuthError;
use crate::events::{AuthEventHub, Subscription};
use crate::models::{now_unix, AuthEvent, Session, SignUpRequest, User, UserMetadata};
use crate::provider::IdentityProvider;

const SESSION_LIFETIME_SECS: u64 = 3600;
const MIN_PASSWORD_LEN: usize = 6;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Debug)]
struct Account {
    password: String,
    user: User,
}

/// In-memory IdentityProvider for testing and offline development.
///
/// Error messages match the ones a GoTrue server sends for the same situations.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Session>>,
    session_error: Mutex<Option<String>>,
    require_confirmation: AtomicBool,
    issued: AtomicU64,
    events: AuthEventHub,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account up front.
    pub fn with_account(
        self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Self {
        let user = self.new_user(
            email,
            UserMetadata {
                first_name: Some(first_name.to_string()),
                last_name: Some(last_name.to_string()),
            },
        );
        lock(&self.accounts).insert(
            email.to_lowercase(),
            Account {
                password: password.to_string(),
                user,
            },
        );
        self
    }

    /// Start with an already-established session, as if restored from storage.
    pub fn with_session(self, session: Session) -> Self {
        *lock(&self.current) = Some(session);
        self
    }

    /// Make every `get_session` call fail with `message`.
    pub fn failing_get_session(self, message: &str) -> Self {
        *lock(&self.session_error) = Some(message.to_string());
        self
    }

    /// Sign-ups succeed without issuing a session.
    pub fn requiring_confirmation(self) -> Self {
        self.require_confirmation.store(true, Ordering::SeqCst);
        self
    }

    /// Simulate a provider push (sign-in in another tab, refresh, remote logout).
    pub fn push_event(&self, event: AuthEvent, session: Option<Session>) {
        *lock(&self.current) = session.clone();
        self.events.emit(event, session.as_ref());
    }

    /// Issue a session for `email` without going through sign-in.
    pub fn session_for(&self, email: &str) -> Session {
        let user = lock(&self.accounts)
            .get(&email.to_lowercase())
            .map(|account| account.user.clone())
            .unwrap_or_else(|| self.new_user(email, UserMetadata::default()));
        self.issue_session(user)
    }

    pub fn current_session(&self) -> Option<Session> {
        lock(&self.current).clone()
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    fn next_serial(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst)
    }

    fn new_user(&self, email: &str, user_metadata: UserMetadata) -> User {
        User {
            id: format!("user-{}", self.next_serial()),
            email: Some(email.to_lowercase()),
            user_metadata,
        }
    }

    fn issue_session(&self, user: User) -> Session {
        let serial = self.next_serial();
        Session {
            access_token: format!("memory-access-{serial}"),
            token_type: "bearer".to_string(),
            expires_in: SESSION_LIFETIME_SECS,
            expires_at: Some(now_unix() + SESSION_LIFETIME_SECS),
            refresh_token: format!("memory-refresh-{serial}"),
            user,
        }
    }

    fn establish(&self, session: Session) -> Session {
        *lock(&self.current) = Some(session.clone());
        self.events.emit(AuthEvent::SignedIn, Some(&session));
        session
    }
}

impl IdentityProvider for MemoryProvider {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        if let Some(message) = lock(&self.session_error).clone() {
            return Err(AuthError::rejected(503, message));
        }
        Ok(self.current_session())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let account = lock(&self.accounts).get(&email.trim().to_lowercase()).cloned();
        match account {
            Some(account) if account.password == password => {
                let session = self.issue_session(account.user);
                Ok(self.establish(session))
            }
            _ => Err(AuthError::rejected(400, "Invalid login credentials")),
        }
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<Option<Session>, AuthError> {
        let email = request.email.trim().to_lowercase();
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::rejected(
                422,
                "Password should be at least 6 characters.",
            ));
        }
        if lock(&self.accounts).contains_key(&email) {
            return Err(AuthError::rejected(422, "User already registered"));
        }

        let user = self.new_user(&email, request.metadata());
        lock(&self.accounts).insert(
            email,
            Account {
                password: request.password.clone(),
                user: user.clone(),
            },
        );

        if self.require_confirmation.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let session = self.issue_session(user);
        Ok(Some(self.establish(session)))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        lock(&self.current).take();
        self.events.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_with_registered_account() {
        let provider = MemoryProvider::new().with_account("Ada@Example.com", "secret1", "Ada", "Lovelace");

        let session = provider
            .sign_in_with_password("ada@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(session.user.display_name(), "Ada Lovelace");
        assert_eq!(provider.current_session(), Some(session));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_password() {
        let provider = MemoryProvider::new().with_account("ada@example.com", "secret1", "Ada", "Lovelace");

        let err = provider
            .sign_in_with_password("ada@example.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(provider.current_session().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_then_duplicate() {
        let provider = MemoryProvider::new();
        let request = SignUpRequest::new("grace@example.com", "cobol60", "Grace", "Hopper");

        let session = provider.sign_up(&request).await.unwrap().unwrap();
        assert_eq!(
            session.user.user_metadata.first_name.as_deref(),
            Some("Grace")
        );

        let err = provider.sign_up(&request).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "User already registered");
    }

    #[tokio::test]
    async fn test_sign_up_requiring_confirmation_issues_no_session() {
        let provider = MemoryProvider::new().requiring_confirmation();
        let request = SignUpRequest::new("grace@example.com", "cobol60", "Grace", "Hopper");

        assert!(provider.sign_up(&request).await.unwrap().is_none());
        assert!(provider.current_session().is_none());
        // The account exists, so signing in works.
        assert!(provider
            .sign_in_with_password("grace@example.com", "cobol60")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let provider = MemoryProvider::new();
        let request = SignUpRequest::new("a@b.io", "123", "A", "B");
        let err = provider.sign_up(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Password should be at least 6 characters.");
    }

    #[tokio::test]
    async fn test_get_session_failure_is_scripted() {
        let provider = MemoryProvider::new().failing_get_session("service unavailable");
        let err = provider.get_session().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }
}
