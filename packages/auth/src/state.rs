//! Authentication snapshot rendered by the UI.

use crate::models::{Session, User};

/// Current authentication state.
///
/// Only constructible from an optional session, so `user` is present exactly
/// when `session` is.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    user: Option<User>,
    session: Option<Session>,
    is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}

impl AuthState {
    /// State before the bootstrap fetch has resolved.
    pub fn loading() -> Self {
        Self {
            user: None,
            session: None,
            is_loading: true,
        }
    }

    /// Resolved state for the given session (signed out when `None`).
    pub fn from_session(session: Option<Session>) -> Self {
        Self {
            user: session.as_ref().map(|s| s.user.clone()),
            session,
            is_loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
