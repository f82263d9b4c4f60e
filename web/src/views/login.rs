use dioxus::prelude::*;
use types::forms::LoginForm;

use super::components::FieldError;

/// Posts straight to `/auth/login` so the server can set the cookie and
/// redirect.
#[component]
pub fn Login(error: Option<String>, redirect: Option<String>) -> Element {
    let mut form = use_signal(LoginForm::default);
    let mut touched = use_signal(|| false);

    let errors = form.read().validate();
    let shown_errors = if touched() { errors.clone() } else { Default::default() };

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    h1 { class: "login-title", "Tally" }
                    p { class: "login-subtitle", "Sign in to your account" }
                }
                if let Some(error) = error.filter(|e| !e.is_empty()) {
                    div { class: "alert alert-error", "{error}" }
                }
                form {
                    action: "/auth/login",
                    method: "post",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "email", "Email" }
                        input {
                            id: "email",
                            name: "email",
                            class: "form-input",
                            r#type: "email",
                            autocomplete: "username",
                            placeholder: "you@example.com",
                            value: "{form.read().email}",
                            oninput: move |e| form.write().email = e.value(),
                            onblur: move |_| touched.set(true),
                        }
                        FieldError { errors: shown_errors.clone(), field: "email" }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "password", "Password" }
                        input {
                            id: "password",
                            name: "password",
                            class: "form-input",
                            r#type: "password",
                            autocomplete: "current-password",
                            value: "{form.read().password}",
                            oninput: move |e| form.write().password = e.value(),
                            onblur: move |_| touched.set(true),
                        }
                        FieldError { errors: shown_errors, field: "password" }
                    }
                    if let Some(redirect) = redirect {
                        input { r#type: "hidden", name: "redirect", value: "{redirect}" }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-primary login-btn",
                        disabled: !errors.is_empty(),
                        "Sign in"
                    }
                }
            }
        }
    }
}
