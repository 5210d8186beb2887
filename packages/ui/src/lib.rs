//! This crate contains all shared UI for the workspace.

pub mod components;
pub mod views;

mod session;
pub use session::{
    sign_out_detached, use_auth, use_gateway, AuthProvider, Gateway, RouterNavigator,
};

mod guard;
pub use guard::RequireAuth;

pub use views::{AuthForm, AuthView, DashboardShell, HomeView};
