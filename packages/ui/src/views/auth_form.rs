//! Sign-in / create-account card.

use dioxus::prelude::*;

use crate::components::{Alert, AlertKind};
use crate::use_gateway;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    SignIn,
    SignUp,
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn sign_in_problem(email: &str, password: &str) -> Option<&'static str> {
    if !looks_like_email(email) {
        return Some("Please enter a valid email address");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 6 characters");
    }
    None
}

fn sign_up_problem(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Option<&'static str> {
    if first_name.trim().is_empty() {
        return Some("First name is required");
    }
    if last_name.trim().is_empty() {
        return Some("Last name is required");
    }
    if let Some(problem) = sign_in_problem(email, password) {
        return Some(problem);
    }
    if password != confirm_password {
        return Some("Passwords do not match");
    }
    None
}

/// Labelled input bound to a string signal.
#[component]
fn Field(
    id: String,
    label: String,
    #[props(default = "text".to_string())] input_type: String,
    value: String,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            class: "flex flex-col gap-1.5",
            label { class: "text-sm font-medium text-neutral-700", r#for: "{id}", "{label}" }
            input {
                id: "{id}",
                class: "w-full px-3 py-2 border border-neutral-300 rounded text-sm focus:outline-none focus:ring-2 focus:ring-sky-500",
                r#type: "{input_type}",
                value: "{value}",
                oninput: move |evt: FormEvent| oninput.call(evt.value()),
            }
        }
    }
}

/// Card that signs users in or registers them through the auth gateway.
///
/// Provider errors are shown verbatim. The submit button is disabled while a
/// request is in flight so a form never has two outstanding requests.
#[component]
pub fn AuthForm() -> Element {
    let gateway = use_gateway();
    let mut mode = use_signal(|| Mode::SignIn);
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let sign_in_gateway = gateway.clone();
    let handle_sign_in = move |evt: FormEvent| {
        evt.prevent_default();
        let gateway = sign_in_gateway.clone();
        spawn(async move {
            error.set(None);
            notice.set(None);

            let e = email().trim().to_string();
            let p = password();
            if let Some(problem) = sign_in_problem(&e, &p) {
                error.set(Some(problem.to_string()));
                return;
            }

            loading.set(true);
            match gateway.sign_in(&e, &p).await {
                Ok(_) => notice.set(Some("Signed in successfully. Welcome back!".to_string())),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };

    let handle_sign_up = move |evt: FormEvent| {
        evt.prevent_default();
        let gateway = gateway.clone();
        spawn(async move {
            error.set(None);
            notice.set(None);

            let f = first_name().trim().to_string();
            let l = last_name().trim().to_string();
            let e = email().trim().to_string();
            let p = password();
            if let Some(problem) = sign_up_problem(&f, &l, &e, &p, &confirm_password()) {
                error.set(Some(problem.to_string()));
                return;
            }

            loading.set(true);
            match gateway.sign_up(&e, &p, &f, &l).await {
                Ok(Some(_)) => notice.set(Some(
                    "Signed up successfully. Welcome to the application!".to_string(),
                )),
                Ok(None) => notice.set(Some(
                    "Check your email to confirm your account.".to_string(),
                )),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };

    let toggle_mode = move |_| {
        let next = match mode() {
            Mode::SignIn => Mode::SignUp,
            Mode::SignUp => Mode::SignIn,
        };
        mode.set(next);
        password.set(String::new());
        confirm_password.set(String::new());
        error.set(None);
        notice.set(None);
    };

    let is_sign_in = mode() == Mode::SignIn;

    rsx! {
        div {
            class: "w-full max-w-md mx-auto bg-white border border-neutral-200 rounded-lg shadow-sm",

            div {
                class: "p-6 pb-2",
                h2 {
                    class: "text-xl font-semibold text-neutral-800",
                    if is_sign_in { "Sign In" } else { "Create Account" }
                }
                p {
                    class: "mt-1 text-sm text-neutral-500",
                    if is_sign_in {
                        "Enter your email and password to sign in"
                    } else {
                        "Fill in the form to create a new account"
                    }
                }
            }

            div {
                class: "flex flex-col gap-3 px-6 py-4",

                if let Some(err) = error() {
                    Alert { kind: AlertKind::Error, message: err }
                }
                if let Some(msg) = notice() {
                    Alert { kind: AlertKind::Success, message: msg }
                }

                if is_sign_in {
                    form {
                        onsubmit: handle_sign_in,
                        class: "flex flex-col gap-4",
                        Field {
                            id: "email",
                            label: "Email",
                            input_type: "email",
                            value: email(),
                            oninput: move |v: String| email.set(v),
                        }
                        Field {
                            id: "password",
                            label: "Password",
                            input_type: "password",
                            value: password(),
                            oninput: move |v: String| password.set(v),
                        }
                        button {
                            class: "w-full px-4 py-2 rounded bg-sky-700 text-white text-[0.9375rem] font-medium hover:bg-sky-800 disabled:opacity-50 disabled:cursor-not-allowed",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Signing in..." } else { "Sign In" }
                        }
                    }
                } else {
                    form {
                        onsubmit: handle_sign_up,
                        class: "flex flex-col gap-4",
                        div {
                            class: "grid grid-cols-2 gap-4",
                            Field {
                                id: "firstName",
                                label: "First Name",
                                value: first_name(),
                                oninput: move |v: String| first_name.set(v),
                            }
                            Field {
                                id: "lastName",
                                label: "Last Name",
                                value: last_name(),
                                oninput: move |v: String| last_name.set(v),
                            }
                        }
                        Field {
                            id: "email",
                            label: "Email",
                            input_type: "email",
                            value: email(),
                            oninput: move |v: String| email.set(v),
                        }
                        Field {
                            id: "password",
                            label: "Password",
                            input_type: "password",
                            value: password(),
                            oninput: move |v: String| password.set(v),
                        }
                        Field {
                            id: "confirmPassword",
                            label: "Confirm Password",
                            input_type: "password",
                            value: confirm_password(),
                            oninput: move |v: String| confirm_password.set(v),
                        }
                        button {
                            class: "w-full px-4 py-2 rounded bg-sky-700 text-white text-[0.9375rem] font-medium hover:bg-sky-800 disabled:opacity-50 disabled:cursor-not-allowed",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Creating account..." } else { "Create Account" }
                        }
                    }
                }
            }

            div {
                class: "px-6 pb-6",
                button {
                    class: "w-full text-sm text-sky-700 hover:underline bg-transparent border-none cursor-pointer",
                    r#type: "button",
                    onclick: toggle_mode,
                    if is_sign_in {
                        "Need an account? Sign up"
                    } else {
                        "Already have an account? Sign in"
                    }
                }
            }
        }
    }
}
