use dioxus::prelude::*;
use types::{
    format::{category_badge, initials, project_type_badge},
    jira::Project,
};

use super::components::{AdminOnly, EmptyState, LoadError, Loading, Modal};
use super::project_dialog::ProjectDialog;
use crate::{error_message, use_current_user, use_error};

#[component]
pub fn Projects() -> Element {
    if !use_current_user().is_admin {
        return rsx! { AdminOnly {} };
    }

    rsx! { ProjectGrid {} }
}

#[component]
fn ProjectGrid() -> Element {
    let error_state = use_error();
    let mut open = use_signal(|| None::<String>);
    let mut adding_cost = use_signal(|| None::<Project>);
    let mut notice = use_signal(|| None::<String>);

    let mut projects = use_resource(move || async move {
        let result = api::list_projects().await;
        if let Err(e) = &result {
            error_state.redirect_if_unauthorized(e);
        }
        result
    });

    let body = match &*projects.read() {
        None => rsx! { Loading { label: "Loading projects..." } },
        Some(Err(e)) => rsx! {
            LoadError { message: error_message(e), on_retry: move |_| projects.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { title: "No projects found" }
        },
        Some(Ok(list)) => rsx! {
            div { class: "card-grid",
                for project in list.iter().cloned() {
                    ProjectCard {
                        key: "{project.id}",
                        project: project.clone(),
                        on_open: move |key| open.set(Some(key)),
                        on_add_cost: move |project| adding_cost.set(Some(project)),
                    }
                }
            }
        },
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Projects" }
                    p { class: "page-subtitle", "JIRA projects and the people working on them." }
                }
            }

            if let Some(message) = notice() {
                div { class: "alert alert-success", "{message}" }
            }

            if let Some(key) = open() {
                ProjectDialog { key: "{key}", project_key: key.clone(), on_close: move |_| open.set(None) }
            }

            if let Some(project) = adding_cost() {
                ProjectCostModal {
                    project,
                    on_close: move |_| adding_cost.set(None),
                    on_added: move |key: String| {
                        adding_cost.set(None);
                        notice.set(Some(format!("Cost recorded for {key}.")));
                    },
                }
            }

            {body}
        }
    }
}

#[component]
fn ProjectCard(project: Project, on_open: EventHandler<String>, on_add_cost: EventHandler<Project>) -> Element {
    let category = project.category_name().map(str::to_string);
    let key = project.key.clone();
    let cost_project = project.clone();

    rsx! {
        div { class: "card project-card", onclick: move |_| on_open.call(key.clone()),
            div { class: "card-body",
                div { class: "project-card-header",
                    span { class: "avatar", "{initials(&project.name)}" }
                    div {
                        h3 { class: "card-title", "{project.name}" }
                        span { class: "text-muted text-sm", "{project.key}" }
                    }
                }
                div { class: "project-card-badges",
                    span { class: project_type_badge(&project.project_type_key), "{project.project_type_key}" }
                    if let Some(category) = &category {
                        span { class: category_badge(Some(category)), "{category}" }
                    }
                    if project.is_private {
                        span { class: "badge badge-gray", "Private" }
                    }
                }
                if let Some(lead) = &project.lead {
                    p { class: "text-muted text-sm", "Lead: {lead.display_name}" }
                }
                div { class: "project-card-footer",
                    button {
                        class: "btn btn-secondary btn-sm",
                        onclick: move |e| {
                            e.stop_propagation();
                            on_add_cost.call(cost_project.clone());
                        },
                        "Add Cost"
                    }
                }
            }
        }
    }
}

#[component]
fn ProjectCostModal(project: Project, on_close: EventHandler<()>, on_added: EventHandler<String>) -> Element {
    let mut error_state = use_error();
    let mut amount = use_signal(String::new);
    let mut saving = use_signal(|| false);

    let cost = amount
        .read()
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|c| c.is_finite() && *c >= 0.0);
    let invalid = !amount.read().trim().is_empty() && cost.is_none();
    let key = project.key.clone();

    rsx! {
        Modal { title: "Add Cost for {project.name}", on_close, busy: saving(), small: true,
            div { class: "modal-body",
                div { class: "form-group",
                    label { class: "form-label", r#for: "cost", "Cost (₹)" }
                    input {
                        id: "cost",
                        class: "form-input",
                        r#type: "number",
                        min: "0",
                        value: "{amount}",
                        oninput: move |e| amount.set(e.value()),
                    }
                    if invalid {
                        p { class: "form-error", "Cost must be a positive number" }
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
                    disabled: saving() || cost.is_none(),
                    onclick: move |_| {
                        let Some(cost) = cost else {
                            return;
                        };
                        let key = key.clone();
                        spawn(async move {
                            saving.set(true);
                            let result = api::add_project_cost(key.clone(), cost).await;
                            saving.set(false);
                            match result {
                                Ok(()) => on_added.call(key),
                                Err(e) => error_state.set_server_error(&e),
                            }
                        });
                    },
                    if saving() { "Saving..." } else { "Add Cost" }
                }
            }
        }
    }
}
