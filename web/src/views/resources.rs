use dioxus::prelude::*;
use types::{
    CostSummary, User,
    format::{inr, percentage},
    forms::ResourceForm,
};

use super::components::{AdminOnly, EmptyState, FieldError, LoadError, Loading, Modal};
use crate::{error_message, use_current_user, use_error};

#[component]
pub fn Resources() -> Element {
    if !use_current_user().is_admin {
        return rsx! { AdminOnly {} };
    }

    rsx! { ResourceBoard {} }
}

/// Which resource modal is open, if any.
#[derive(Debug, Clone, PartialEq)]
enum Editing {
    New,
    Existing(User),
}

#[component]
fn ResourceBoard() -> Element {
    let error_state = use_error();
    let mut editing = use_signal(|| None::<Editing>);
    let mut deleting = use_signal(|| None::<User>);

    let mut overview = use_resource(move || async move {
        let result = api::cost_overview().await;
        if let Err(e) = &result {
            error_state.redirect_if_unauthorized(e);
        }
        result
    });

    let body = match &*overview.read() {
        None => rsx! { Loading { label: "Loading resources..." } },
        Some(Err(e)) => rsx! {
            LoadError { message: error_message(e), on_retry: move |_| overview.restart() }
        },
        Some(Ok(data)) => rsx! {
            SummaryCards { summary: data.summary.clone() }

            if data.users.is_empty() {
                EmptyState { title: "No resources yet", detail: "Add a resource to start tracking costs." }
            } else {
                div { class: "card",
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Department" }
                                    th { "Role" }
                                    th { class: "text-right", "Annual Salary" }
                                    th { class: "text-right", "Overhead" }
                                    th { class: "text-right", "Monthly Cost" }
                                    th { class: "text-right", "Hours / Month" }
                                    th { class: "text-right", "Hourly Cost" }
                                    th {}
                                }
                            }
                            tbody {
                                for user in data.users.iter().cloned() {
                                    ResourceRow {
                                        key: "{user.id}",
                                        user: user.clone(),
                                        on_edit: move |user| editing.set(Some(Editing::Existing(user))),
                                        on_delete: move |user| deleting.set(Some(user)),
                                    }
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
                    h1 { class: "page-title", "Resource Management" }
                    p { class: "page-subtitle", "Salaries, overheads and what each hour costs." }
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| editing.set(Some(Editing::New)),
                        "Add Resource"
                    }
                }
            }

            if let Some(target) = editing() {
                ResourceModal {
                    editing: target,
                    on_close: move |_| editing.set(None),
                    on_saved: move |_| {
                        editing.set(None);
                        overview.restart();
                    },
                }
            }

            if let Some(user) = deleting() {
                DeleteResourceModal {
                    user,
                    on_close: move |_| deleting.set(None),
                    on_deleted: move |_| {
                        deleting.set(None);
                        overview.restart();
                    },
                }
            }

            {body}
        }
    }
}

#[component]
fn SummaryCards(summary: CostSummary) -> Element {
    rsx! {
        div { class: "summary-grid",
            div { class: "card summary-card",
                span { class: "summary-label", "Total Resources" }
                span { class: "summary-value", "{summary.total_users}" }
            }
            div { class: "card summary-card",
                span { class: "summary-label", "Monthly Cost" }
                span { class: "summary-value", "{inr(summary.total_monthly_cost)}" }
            }
            div { class: "card summary-card",
                span { class: "summary-label", "Annual Cost" }
                span { class: "summary-value", "{inr(summary.total_annual_cost)}" }
            }
            div { class: "card summary-card",
                span { class: "summary-label", "Average Hourly Cost" }
                span { class: "summary-value", "{inr(summary.avg_hourly_cost)}" }
            }
        }
    }
}

#[component]
fn ResourceRow(user: User, on_edit: EventHandler<User>, on_delete: EventHandler<User>) -> Element {
    let money = |value: Option<f64>| value.map(inr).unwrap_or_else(|| "-".to_string());
    let overhead = user.overhead.map(percentage).unwrap_or_else(|| "-".to_string());
    let hours = user
        .monthly_hours
        .map(|h| h.to_string())
        .unwrap_or_else(|| "-".to_string());
    let edit_user = user.clone();
    let delete_user = user.clone();

    rsx! {
        tr {
            td {
                div { "{user.name}" }
                div { class: "text-muted text-sm", "{user.email}" }
            }
            td { "{user.department}" }
            td { "{user.role_label()}" }
            td { class: "text-right", "{money(user.salary)}" }
            td { class: "text-right", "{overhead}" }
            td { class: "text-right", "{money(user.monthly_cost())}" }
            td { class: "text-right", "{hours}" }
            td { class: "text-right", "{money(user.hourly_cost())}" }
            td { class: "text-right actions",
                button {
                    class: "btn btn-secondary btn-sm",
                    onclick: move |_| on_edit.call(edit_user.clone()),
                    "Edit"
                }
                button {
                    class: "btn btn-danger btn-sm",
                    onclick: move |_| on_delete.call(delete_user.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn ResourceModal(editing: Editing, on_close: EventHandler<()>, on_saved: EventHandler<()>) -> Element {
    let mut error_state = use_error();
    let initial = match &editing {
        Editing::New => ResourceForm::default(),
        Editing::Existing(user) => ResourceForm::from_user(user),
    };
    let mut form = use_signal(move || initial);
    let mut submitted = use_signal(|| false);
    let mut saving = use_signal(|| false);

    let shown_errors = if submitted() { form.read().validate() } else { Default::default() };
    let title = match &editing {
        Editing::New => "Add Resource".to_string(),
        Editing::Existing(user) => format!("Edit {}", user.name),
    };

    let submit = move |_: MouseEvent| {
        submitted.set(true);
        let editing = editing.clone();
        let form = form.read().clone();

        spawn(async move {
            let result = match &editing {
                Editing::New => {
                    let Some(user) = form.to_new_user() else {
                        return;
                    };
                    saving.set(true);
                    api::create_user(user).await
                }
                Editing::Existing(user) => {
                    let Some(update) = form.to_update() else {
                        return;
                    };
                    saving.set(true);
                    api::update_user(user.id.clone(), update).await
                }
            };
            saving.set(false);

            match result {
                Ok(()) => on_saved.call(()),
                Err(e) => error_state.set_server_error(&e),
            }
        });
    };

    rsx! {
        Modal { title, on_close, busy: saving(),
            div { class: "modal-body",
                div { class: "form-row",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "name", "Name *" }
                        input {
                            id: "name",
                            class: "form-input",
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
                            value: "{form.read().email}",
                            oninput: move |e| form.write().email = e.value(),
                        }
                        FieldError { errors: shown_errors.clone(), field: "email" }
                    }
                }
                div { class: "form-row",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "department", "Department" }
                        input {
                            id: "department",
                            class: "form-input",
                            value: "{form.read().department}",
                            oninput: move |e| form.write().department = e.value(),
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "role", "Role" }
                        input {
                            id: "role",
                            class: "form-input",
                            value: "{form.read().role}",
                            oninput: move |e| form.write().role = e.value(),
                        }
                    }
                }
                div { class: "form-row",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "salary", "Annual Salary (₹)" }
                        input {
                            id: "salary",
                            class: "form-input",
                            r#type: "number",
                            min: "0",
                            value: "{form.read().salary}",
                            oninput: move |e| form.write().salary = e.value(),
                        }
                        FieldError { errors: shown_errors.clone(), field: "salary" }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "overhead", "Overhead (%)" }
                        input {
                            id: "overhead",
                            class: "form-input",
                            r#type: "number",
                            min: "0",
                            value: "{form.read().overhead}",
                            oninput: move |e| form.write().overhead = e.value(),
                        }
                        FieldError { errors: shown_errors.clone(), field: "overhead" }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "monthly-hours", "Hours / Month" }
                        input {
                            id: "monthly-hours",
                            class: "form-input",
                            r#type: "number",
                            min: "0",
                            placeholder: "160",
                            value: "{form.read().monthly_hours}",
                            oninput: move |e| form.write().monthly_hours = e.value(),
                        }
                        FieldError { errors: shown_errors, field: "monthlyHours" }
                    }
                }
            }
            div { class: "modal-footer",
                button {
                    class: "btn btn-secondary",
                    disabled: saving(),
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    disabled: saving(),
                    onclick: submit,
                    if saving() { "Saving..." } else { "Save" }
                }
            }
        }
    }
}

#[component]
fn DeleteResourceModal(user: User, on_close: EventHandler<()>, on_deleted: EventHandler<()>) -> Element {
    let mut error_state = use_error();
    let mut deleting = use_signal(|| false);
    let user_id = user.id.clone();

    rsx! {
        Modal { title: "Delete Resource", on_close, busy: deleting(), small: true,
            div { class: "modal-body",
                p { "Delete {user.name}? This cannot be undone." }
            }
            div { class: "modal-footer",
                button {
                    class: "btn btn-secondary",
                    disabled: deleting(),
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-danger",
                    disabled: deleting(),
                    onclick: move |_| {
                        let user_id = user_id.clone();
                        spawn(async move {
                            deleting.set(true);
                            let result = api::delete_user(user_id).await;
                            deleting.set(false);
                            match result {
                                Ok(()) => on_deleted.call(()),
                                Err(e) => error_state.set_server_error(&e),
                            }
                        });
                    },
                    if deleting() { "Deleting..." } else { "Delete" }
                }
            }
        }
    }
}
