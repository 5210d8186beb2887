//! # Auth crate: session lifecycle for the Databank dashboard
//!
//! Everything here is UI-independent so it can be exercised from plain async tests
//! and reused by any frontend shell.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | [`Session`], [`User`], [`AuthEvent`] and the sign-up request |
//! | [`state`] | [`AuthState`], the snapshot consumers render from |
//! | [`provider`] | The [`IdentityProvider`] capability trait |
//! | [`events`] | [`AuthEventHub`] listener registry and the [`Subscription`] guard |
//! | [`session_store`] | [`SessionStore`]: bootstrap, event application, teardown |
//! | [`gateway`] | [`AuthGateway`]: sign-in, sign-up and sign-out with navigation |
//! | [`supabase`] | [`SupabaseProvider`], a GoTrue REST client |
//! | [`storage`] | Session persistence backends |
//! | [`config`] | [`ProviderConfig`] from the environment |

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod models;
pub mod provider;
pub mod session_store;
pub mod state;
pub mod storage;
pub mod supabase;

mod memory;
pub use memory::MemoryProvider;

pub use config::ProviderConfig;
pub use error::AuthError;
pub use events::{AuthEventHub, Subscription};
pub use gateway::{AuthGateway, AuthResponse, Navigator, AUTH_ROUTE, HOME_ROUTE};
pub use models::{AuthEvent, Session, SignUpRequest, User, UserMetadata};
pub use provider::IdentityProvider;
pub use session_store::SessionStore;
pub use state::AuthState;
pub use storage::{MemorySessionStorage, SessionStorage};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileSessionStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalSessionStorage;
pub use supabase::SupabaseProvider;
