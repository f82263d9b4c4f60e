use dioxus::prelude::*;
use types::forms::PasswordChange;

use super::components::FieldError;
use crate::{Route, error_message, use_error};

#[component]
pub fn ChangePassword() -> Element {
    let error_state = use_error();
    let mut form = use_signal(PasswordChange::default);
    let mut submitted = use_signal(|| false);
    let mut saving = use_signal(|| false);
    let mut failure = use_signal(|| None::<String>);
    let mut changed = use_signal(|| false);

    let shown_errors = if submitted() { form.read().validate() } else { Default::default() };

    if changed() {
        return rsx! {
            div { class: "card narrow",
                div { class: "card-body",
                    h2 { class: "card-title", "Password changed" }
                    p { class: "text-muted", "Your new password is active." }
                    Link { to: Route::Leaderboard {}, class: "btn btn-primary", "Go to the leaderboard" }
                }
            }
        };
    }

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Change Password" }
                    p { class: "page-subtitle", "Pick a new password for your account." }
                }
            }

            div { class: "card narrow",
                div { class: "card-body",
                    if let Some(message) = failure() {
                        div { class: "alert alert-error", "{message}" }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "current-password", "Current password" }
                        input {
                            id: "current-password",
                            class: "form-input",
                            r#type: "password",
                            autocomplete: "current-password",
                            value: "{form.read().current_password}",
                            oninput: move |e| form.write().current_password = e.value(),
                        }
                        FieldError { errors: shown_errors.clone(), field: "currentPassword" }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "new-password", "New password" }
                        input {
                            id: "new-password",
                            class: "form-input",
                            r#type: "password",
                            autocomplete: "new-password",
                            value: "{form.read().new_password}",
                            oninput: move |e| form.write().new_password = e.value(),
                        }
                        FieldError { errors: shown_errors, field: "newPassword" }
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: saving(),
                        onclick: move |_| {
                            submitted.set(true);
                            if !form.read().validate().is_empty() {
                                return;
                            }
                            let PasswordChange { current_password, new_password } = form.read().clone();
                            spawn(async move {
                                saving.set(true);
                                failure.set(None);
                                let result = api::change_password(current_password, new_password).await;
                                saving.set(false);
                                match result {
                                    Ok(()) => changed.set(true),
                                    Err(e) if error_state.redirect_if_unauthorized(&e) => {}
                                    Err(e) => failure.set(Some(error_message(&e))),
                                }
                            });
                        },
                        if saving() { "Saving..." } else { "Change Password" }
                    }
                }
            }
        }
    }
}
