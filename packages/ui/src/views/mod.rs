mod auth_form;
pub use auth_form::AuthForm;

mod auth_view;
pub use auth_view::AuthView;

mod dashboard_shell;
pub use dashboard_shell::DashboardShell;

mod home;
pub use home::HomeView;
