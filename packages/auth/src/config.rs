//! # Identity provider configuration
//!
//! Two sources, same variable names:
//!
//! | Constructor | Source | Use |
//! |-------------|--------|-----|
//! | [`ProviderConfig::from_env`] | process environment, `.env` via `dotenvy` | native builds |
//! | [`ProviderConfig::from_build_env`] | `option_env!` at compile time | WASM builds |
//!
//! `SUPABASE_URL` is the project URL (no `/auth/v1` suffix). `SUPABASE_ANON_KEY` is
//! the public anon key sent as the `apikey` header; it may be empty when talking
//! to a bare GoTrue server. Both values are public; never put a service-role key here.

use crate::error::AuthError;

/// Address of a local `supabase start` stack.
pub const DEFAULT_URL: &str = "http://localhost:54321";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub url: String,
    pub anon_key: String,
}

impl ProviderConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, AuthError> {
        let url = normalize_url(url)
            .ok_or_else(|| AuthError::Config("identity provider URL is empty".to_string()))?;
        Ok(Self {
            url,
            anon_key: anon_key.trim().to_string(),
        })
    }

    /// Load from `SUPABASE_URL` / `SUPABASE_ANON_KEY`, reading `.env` first.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| AuthError::Config("SUPABASE_URL not set".to_string()))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY").unwrap_or_default();
        Self::new(&url, &anon_key)
    }

    /// Values baked in at compile time, defaulting to the local development stack.
    pub fn from_build_env() -> Self {
        let url = option_env!("SUPABASE_URL")
            .and_then(normalize_url)
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        Self {
            url,
            anon_key: option_env!("SUPABASE_ANON_KEY").unwrap_or("").to_string(),
        }
    }

    /// Full URL of a GoTrue endpoint, e.g. `endpoint("signup")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path.trim_start_matches('/'))
    }
}

fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
