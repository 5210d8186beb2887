//! # Domain models for identities and sessions
//!
//! These mirror the JSON shapes a GoTrue (Supabase Auth) server returns, so they
//! deserialize straight from its responses and serialize back for local persistence.
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`User`] | The identity record owned by the provider. Read-only here. |
//! | [`UserMetadata`] | Profile fields attached at sign-up (`first_name`, `last_name`). |
//! | [`Session`] | Access/refresh token bundle plus the user it was issued to. |
//! | [`SignUpRequest`] | Credentials and profile fields for account registration. |
//! | [`AuthEvent`] | Kind of a provider-pushed auth-state change. |
//!
//! `Session` and `SignUpRequest` have hand-written `Debug` impls that redact
//! tokens and passwords so they can be logged with `?value`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sessions this close to expiry are treated as expired and refreshed.
pub const EXPIRY_MARGIN_SECS: u64 = 10;

/// Profile metadata stored alongside a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Identity record returned by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl User {
    /// Full name from the profile, falling back to the email, then the id.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [
            self.user_metadata.first_name.as_deref(),
            self.user_metadata.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }
        self.email.clone().unwrap_or_else(|| self.id.clone())
    }

    /// Two upper-case letters for the avatar bubble.
    pub fn initials(&self) -> String {
        let first = initial(self.user_metadata.first_name.as_deref());
        let last = initial(self.user_metadata.last_name.as_deref());
        if let (Some(first), Some(last)) = (first, last) {
            return format!("{first}{last}");
        }

        let source = self
            .email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .unwrap_or(&self.id);
        source
            .chars()
            .filter(|c| c.is_alphanumeric())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

fn initial(name: Option<&str>) -> Option<char> {
    name?.trim().chars().next().and_then(|c| c.to_uppercase().next())
}

/// Credential bundle issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds at issue time.
    #[serde(default)]
    pub expires_in: u64,
    /// Absolute expiry as unix seconds.
    #[serde(default)]
    pub expires_at: Option<u64>,
    pub refresh_token: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Whether the session is expired (or about to be) at `now` unix seconds.
    /// Sessions without any expiry information never expire locally.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at
            .is_some_and(|at| at <= now.saturating_add(EXPIRY_MARGIN_SECS))
    }

    /// Fill `expires_at` from `expires_in` when the provider omitted it.
    pub fn with_expiry_from(mut self, now: u64) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now.saturating_add(self.expires_in));
        }
        self
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("refresh_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Registration payload; the names travel as profile metadata.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignUpRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn metadata(&self) -> UserMetadata {
        UserMetadata {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
        }
    }
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Kind of auth-state change pushed by a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Current time in unix seconds.
pub(crate) fn now_unix() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Date::now() / 1000.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: Option<&str>, first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: "7c1f".to_string(),
            email: email.map(str::to_string),
            user_metadata: UserMetadata {
                first_name: first.map(str::to_string),
                last_name: last.map(str::to_string),
            },
        }
    }

    fn session(expires_at: Option<u64>) -> Session {
        Session {
            access_token: "access-secret".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at,
            refresh_token: "refresh-secret".to_string(),
            user: user(Some("ada@example.com"), None, None),
        }
    }

    #[test]
    fn display_name_prefers_profile_names() {
        let u = user(Some("ada@example.com"), Some("Ada"), Some("Lovelace"));
        assert_eq!(u.display_name(), "Ada Lovelace");

        let u = user(Some("ada@example.com"), Some("  "), None);
        assert_eq!(u.display_name(), "ada@example.com");

        let u = user(None, None, None);
        assert_eq!(u.display_name(), "7c1f");
    }

    #[test]
    fn initials_from_names_or_email() {
        assert_eq!(
            user(Some("ada@example.com"), Some("ada"), Some("lovelace")).initials(),
            "AL"
        );
        assert_eq!(user(Some("admin@databank.com"), None, None).initials(), "AD");
        assert_eq!(user(Some("j.o@x.io"), Some("Jo"), None).initials(), "JO");
    }

    #[test]
    fn expiry_uses_safety_margin() {
        let s = session(Some(1_000));
        assert!(!s.is_expired(900));
        assert!(s.is_expired(990));
        assert!(s.is_expired(2_000));
        assert!(!session(None).is_expired(u64::MAX));
    }

    #[test]
    fn expiry_is_derived_from_lifetime_when_missing() {
        let s = session(None).with_expiry_from(100);
        assert_eq!(s.expires_at, Some(3_700));

        let s = session(Some(42)).with_expiry_from(100);
        assert_eq!(s.expires_at, Some(42));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", session(Some(1)));
        assert!(!rendered.contains("access-secret"));
        assert!(!rendered.contains("refresh-secret"));
        assert!(rendered.contains("ada@example.com"));

        let request = SignUpRequest::new("ada@example.com", "hunter22", "Ada", "Lovelace");
        assert!(!format!("{request:?}").contains("hunter22"));
    }

    #[test]
    fn session_deserializes_from_gotrue_token_response() {
        let body = r#"{
            "access_token": "eyJ",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700003600,
            "refresh_token": "r1",
            "user": {
                "id": "0b6f",
                "aud": "authenticated",
                "email": "ada@example.com",
                "user_metadata": {"first_name": "Ada", "last_name": "Lovelace"}
            }
        }"#;
        let s: Session = serde_json::from_str(body).unwrap();
        assert_eq!(s.expires_at, Some(1_700_003_600));
        assert_eq!(s.user.display_name(), "Ada Lovelace");
    }
}
