use dioxus::prelude::*;
use types::forms::UserForm;

use super::components::{EmptyState, FieldError, LoadError, Loading, Modal};
use crate::{error_message, use_current_user, use_error};

#[component]
pub fn Users() -> Element {
    let error_state = use_error();
    let is_admin = use_current_user().is_admin;
    let mut show_create_form = use_signal(|| false);
    let mut notice = use_signal(|| None::<String>);

    let mut users = use_resource(move || async move {
        let result = api::list_users().await;
        if let Err(e) = &result {
            error_state.redirect_if_unauthorized(e);
        }
        result
    });

    let body = match &*users.read() {
        None => rsx! { Loading { label: "Loading users..." } },
        Some(Err(e)) => rsx! {
            LoadError { message: error_message(e), on_retry: move |_| users.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { title: "No users found" }
        },
        Some(Ok(list)) => rsx! {
            div { class: "card",
                div { class: "table-container",
                    table {
                        thead {
                            tr {
                                th { "Name" }
                                th { "Email" }
                                th { "Department" }
                                th { "Role" }
                                th { class: "text-right", "Points" }
                            }
                        }
                        tbody {
                            for user in list.iter() {
                                tr { key: "{user.id}",
                                    td { "{user.name}" }
                                    td { "{user.email}" }
                                    td { "{user.department}" }
                                    td { "{user.role_label()}" }
                                    td { class: "text-right", "{user.total_points}" }
                                }
                            }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Users" }
                    p { class: "page-subtitle", "Everyone on the team and their points." }
                }
                if is_admin {
                    div { class: "page-header-actions",
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| show_create_form.set(true),
                            "Create User"
                        }
                    }
                }
            }

            if let Some(message) = notice() {
                div { class: "alert alert-success", "{message}" }
            }

            if is_admin && show_create_form() {
                CreateUserModal {
                    on_close: move |_| show_create_form.set(false),
                    on_created: move |name: String| {
                        show_create_form.set(false);
                        notice.set(Some(format!("{name} was added.")));
                        users.restart();
                    },
                }
            }

            {body}
        }
    }
}

#[component]
fn CreateUserModal(on_close: EventHandler<()>, on_created: EventHandler<String>) -> Element {
    let mut error_state = use_error();
    let mut form = use_signal(UserForm::default);
    let mut submitted = use_signal(|| false);
    let mut creating = use_signal(|| false);

    let errors = form.read().validate();
    let shown_errors = if submitted() { errors.clone() } else { Default::default() };

    rsx! {
        Modal { title: "Create User", on_close, busy: creating(),
            div { class: "modal-body",
                div { class: "form-group",
                    label { class: "form-label", r#for: "name", "Name *" }
                    input {
                        id: "name",
                        class: "form-input",
                        r#type: "text",
                        placeholder: "e.g. Asha Patel",
                        value: "{form.read().name}",
                        oninput: move |e| form.write().name = e.value(),
                    }
                    FieldError { errors: shown_errors.clone(), field: "name" }
                }
                div { class: "form-group",
                    label { class: "form-label", r#for: "email", "Email *" }
                    input {
                        id: "email",
                        class: "form-input",
                        r#type: "email",
                        placeholder: "e.g. asha@example.com",
                        value: "{form.read().email}",
                        oninput: move |e| form.write().email = e.value(),
                    }
                    FieldError { errors: shown_errors.clone(), field: "email" }
                }
                div { class: "form-group",
                    label { class: "form-label", r#for: "department", "Department" }
                    input {
                        id: "department",
                        class: "form-input",
                        r#type: "text",
                        value: "{form.read().department}",
                        oninput: move |e| form.write().department = e.value(),
                    }
                }
                div { class: "form-group",
                    label { class: "form-label", r#for: "role", "Role *" }
                    input {
                        id: "role",
                        class: "form-input",
                        r#type: "text",
                        placeholder: "e.g. Developer",
                        value: "{form.read().role}",
                        oninput: move |e| form.write().role = e.value(),
                    }
                    FieldError { errors: shown_errors, field: "role" }
                }
            }
            div { class: "modal-footer",
                button {
                    class: "btn btn-secondary",
                    disabled: creating(),
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    disabled: creating(),
                    onclick: move |_| {
                        submitted.set(true);
                        if !form.read().validate().is_empty() {
                            return;
                        }
                        let user = form.read().to_new_user();
                        spawn(async move {
                            creating.set(true);
                            let result = api::create_user(user.clone()).await;
                            creating.set(false);
                            match result {
                                Ok(()) => on_created.call(user.name),
                                Err(e) => error_state.set_server_error(&e),
                            }
                        });
                    },
                    if creating() { "Creating..." } else { "Create" }
                }
            }
        }
    }
}
