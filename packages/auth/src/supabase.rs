//! # GoTrue (Supabase Auth) identity provider
//!
//! [`SupabaseProvider`] implements [`IdentityProvider`] over the GoTrue REST API
//! with `reqwest`, which also works in the browser through `fetch`.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | sign in | `POST /auth/v1/token?grant_type=password` |
//! | refresh | `POST /auth/v1/token?grant_type=refresh_token` |
//! | sign up | `POST /auth/v1/signup` with names under `data` |
//! | sign out | `POST /auth/v1/logout` with the bearer token |
//!
//! The issued session lives in memory and in a [`SessionStorage`] backend.
//! `get_session` prefers memory, falls back to storage, and refreshes sessions that
//! are about to expire. Local state changes are announced through the
//! provider's [`AuthEventHub`], the same way supabase-js does in the browser.

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ProviderConfig;
use crate::error::AuthError;
use crate::events::{AuthEventHub, Subscription};
use crate::models::{now_unix, AuthEvent, Session, SignUpRequest, UserMetadata};
use crate::provider::IdentityProvider;
use crate::storage::SessionStorage;

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: UserMetadata,
}

pub struct SupabaseProvider {
    http: reqwest::Client,
    config: ProviderConfig,
    storage: Box<dyn SessionStorage>,
    current: Mutex<Option<Session>>,
    events: AuthEventHub,
}

impl SupabaseProvider {
    pub fn new(config: ProviderConfig, storage: impl SessionStorage + 'static) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            storage: Box::new(storage),
            current: Mutex::new(None),
            events: AuthEventHub::new(),
        }
    }

    fn current(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.http.post(self.config.endpoint(path));
        if self.config.anon_key.is_empty() {
            request
        } else {
            request.header("apikey", &self.config.anon_key)
        }
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AuthError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::rejected(
                status.as_u16(),
                error_message(status.as_u16(), &body),
            ));
        }
        serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Session from memory, else from storage. Corrupt stored data is dropped;
    /// a failed read leaves the stored session in place for the next attempt.
    fn restore(&self) -> Option<Session> {
        if let Some(session) = self.current().clone() {
            return Some(session);
        }
        match self.storage.load() {
            Ok(Some(session)) => {
                *self.current() = Some(session.clone());
                Some(session)
            }
            Ok(None) => None,
            Err(err @ AuthError::Decode(_)) => {
                tracing::warn!(error = %err, "discarding corrupt stored session");
                if let Err(err) = self.storage.clear() {
                    tracing::warn!(error = %err, "could not clear stored session");
                }
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored session");
                None
            }
        }
    }

    fn remember(&self, session: Session) -> Session {
        let session = session.with_expiry_from(now_unix());
        if let Err(err) = self.storage.save(&session) {
            tracing::warn!(error = %err, "could not persist session");
        }
        *self.current() = Some(session.clone());
        session
    }

    fn forget(&self) -> Option<Session> {
        let previous = self.current().take();
        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "could not clear stored session");
        }
        previous
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let request = self
            .post("token?grant_type=refresh_token")
            .json(&RefreshGrant { refresh_token });
        Self::send(request).await
    }
}

impl IdentityProvider for SupabaseProvider {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.restore() else {
            return Ok(None);
        };
        if !session.is_expired(now_unix()) {
            return Ok(Some(session));
        }

        tracing::debug!("stored session expired; refreshing");
        match self.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                let fresh = self.remember(fresh);
                self.events.emit(AuthEvent::TokenRefreshed, Some(&fresh));
                Ok(Some(fresh))
            }
            Err(err) => {
                self.forget();
                Err(err)
            }
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let request = self
            .post("token?grant_type=password")
            .json(&PasswordGrant {
                email: email.trim(),
                password,
            });
        let session = self.remember(Self::send(request).await?);
        self.events.emit(AuthEvent::SignedIn, Some(&session));
        Ok(session)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<Option<Session>, AuthError> {
        let body = SignUpBody {
            email: request.email.trim(),
            password: &request.password,
            data: request.metadata(),
        };
        let response: serde_json::Value = Self::send(self.post("signup").json(&body)).await?;

        let Some(session) = session_from_signup(response)? else {
            return Ok(None);
        };
        let session = self.remember(session);
        self.events.emit(AuthEvent::SignedIn, Some(&session));
        Ok(Some(session))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.forget();
        self.events.emit(AuthEvent::SignedOut, None);

        let Some(session) = previous else {
            return Ok(());
        };
        let response = self
            .post("logout")
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(AuthError::rejected(
            status.as_u16(),
            error_message(status.as_u16(), &body),
        ))
    }

    fn on_auth_state_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }
}

/// Human-readable message from a GoTrue error body.
fn error_message(status: u16, body: &str) -> String {
    const FIELDS: [&str; 4] = ["msg", "message", "error_description", "error"];

    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            FIELDS.iter().find_map(|field| {
                json.get(field)
                    .and_then(serde_json::Value::as_str)
                    .map(str::trim)
                    .filter(|message| !message.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

/// Sign-up answers with a session when autoconfirm is on, a bare user otherwise.
fn session_from_signup(response: serde_json::Value) -> Result<Option<Session>, AuthError> {
    if response.get("access_token").is_none() {
        return Ok(None);
    }
    serde_json::from_value(response)
        .map(Some)
        .map_err(|e| AuthError::Decode(e.to_string()))
}
