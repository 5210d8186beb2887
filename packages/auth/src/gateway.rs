//! # Auth gateway: credential operations with navigation side effects
//!
//! [`AuthGateway`] is what forms and menus call. It never writes auth state itself;
//! the provider's pushed events reach the [`SessionStore`](crate::SessionStore).
//! The gateway only translates outcomes into [`AuthResponse`] values and moves the
//! router:
//!
//! | Operation | Success | Failure |
//! |-----------|---------|---------|
//! | [`sign_in`](AuthGateway::sign_in) | navigate to [`HOME_ROUTE`] | `Err`, no navigation |
//! | [`sign_up`](AuthGateway::sign_up) | navigate to [`HOME_ROUTE`] when a session was issued | `Err`, no navigation |
//! | [`sign_out`](AuthGateway::sign_out) | navigate to [`AUTH_ROUTE`] | logged, still navigates |

use std::sync::Arc;

use crate::error::AuthError;
use crate::models::{Session, SignUpRequest};
use crate::provider::IdentityProvider;

/// Landing route after a successful sign-in or sign-up.
pub const HOME_ROUTE: &str = "/";
/// Route of the sign-in / sign-up screen.
pub const AUTH_ROUTE: &str = "/auth";

/// Outcome of a credential operation. `Ok(None)` means no session was issued
/// (sign-up awaiting email confirmation).
pub type AuthResponse = Result<Option<Session>, AuthError>;

/// Router capability injected into the gateway.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<F: Fn(&str)> Navigator for F {
    fn navigate(&self, path: &str) {
        self(path)
    }
}

/// Uniform entry point for sign-in, sign-up and sign-out.
pub struct AuthGateway<P, N> {
    provider: Arc<P>,
    navigator: N,
}

impl<P, N: Clone> Clone for AuthGateway<P, N> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            navigator: self.navigator.clone(),
        }
    }
}

impl<P: IdentityProvider, N: Navigator> AuthGateway<P, N> {
    pub fn new(provider: Arc<P>, navigator: N) -> Self {
        Self {
            provider,
            navigator,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResponse {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "signed in");
                self.navigator.navigate(HOME_ROUTE);
                Ok(Some(session))
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign-in rejected");
                Err(err)
            }
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> AuthResponse {
        let request = SignUpRequest::new(email, password, first_name, last_name);
        match self.provider.sign_up(&request).await {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.user.id, "signed up");
                self.navigator.navigate(HOME_ROUTE);
                Ok(Some(session))
            }
            Ok(None) => {
                tracing::info!("sign-up accepted; awaiting email confirmation");
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign-up rejected");
                Err(err)
            }
        }
    }

    /// Fire-and-forget: provider errors are logged, navigation always happens.
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.sign_out().await {
            tracing::warn!(error = %err, "sign-out did not complete cleanly");
        }
        tracing::info!("signed out");
        self.navigator.navigate(AUTH_ROUTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryProvider;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Navigator for Recorder {
        fn navigate(&self, path: &str) {
            self.0.lock().unwrap().push(path.to_string());
        }
    }

    impl Recorder {
        fn visits(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    fn gateway(provider: MemoryProvider) -> (AuthGateway<MemoryProvider, Recorder>, Recorder) {
        let recorder = Recorder::default();
        (
            AuthGateway::new(Arc::new(provider), recorder.clone()),
            recorder,
        )
    }

    #[tokio::test]
    async fn test_sign_in_navigates_home() {
        let (gateway, nav) = gateway(
            MemoryProvider::new().with_account("user@example.com", "secret1", "U", "Ser"),
        );
        let session = gateway.sign_in("user@example.com", "secret1").await.unwrap();
        assert!(session.is_some());
        assert_eq!(nav.visits(), vec![HOME_ROUTE]);
    }

    #[tokio::test]
    async fn test_failed_sign_in_stays_put() {
        let (gateway, nav) = gateway(MemoryProvider::new());
        let err = gateway.sign_in("nobody@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(nav.visits().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_navigates_home() {
        let (gateway, nav) = gateway(MemoryProvider::new());
        let session = gateway
            .sign_up("new@example.com", "secret1", "New", "Hire")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.user.display_name(), "New Hire");
        assert_eq!(nav.visits(), vec![HOME_ROUTE]);
    }

    #[tokio::test]
    async fn test_sign_up_pending_confirmation_stays_put() {
        let (gateway, nav) = gateway(MemoryProvider::new().requiring_confirmation());
        let outcome = gateway
            .sign_up("new@example.com", "secret1", "New", "Hire")
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(nav.visits().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_returns_error() {
        let (gateway, nav) = gateway(
            MemoryProvider::new().with_account("taken@example.com", "secret1", "T", "Aken"),
        );
        let err = gateway
            .sign_up("taken@example.com", "secret1", "T", "Aken")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already registered");
        assert!(nav.visits().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_always_navigates_to_auth() {
        let (gateway, nav) = gateway(MemoryProvider::new());
        gateway.sign_out().await;
        assert_eq!(nav.visits(), vec![AUTH_ROUTE]);
    }

    #[tokio::test]
    async fn test_closure_navigator() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let gateway = AuthGateway::new(Arc::new(MemoryProvider::new()), move |path: &str| {
            *sink.lock().unwrap() = Some(path.to_string());
        });
        gateway.sign_out().await;
        assert_eq!(seen.lock().unwrap().as_deref(), Some(AUTH_ROUTE));
    }
}
