use dioxus::prelude::*;
use types::{
    format::{hours, inr, percentage, profit_class},
    worklog::ProjectRow,
};

use super::components::{AdminOnly, EmptyState, LoadError, Loading};
use super::project_dialog::ProjectDialog;
use crate::{error_message, use_current_user, use_error};

#[component]
pub fn ProjectManagement() -> Element {
    if !use_current_user().is_admin {
        return rsx! { AdminOnly {} };
    }

    rsx! { ProjectCostTable {} }
}

#[component]
fn ProjectCostTable() -> Element {
    let error_state = use_error();
    let mut open = use_signal(|| None::<String>);

    let mut rows = use_resource(move || async move {
        let result = api::project_overview().await;
        if let Err(e) = &result {
            error_state.redirect_if_unauthorized(e);
        }
        result
    });

    let body = match &*rows.read() {
        None => rsx! { Loading { label: "Loading project costs..." } },
        Some(Err(e)) => rsx! {
            LoadError { message: error_message(e), on_retry: move |_| rows.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { title: "No projects found" }
        },
        Some(Ok(list)) => rsx! {
            div { class: "card",
                div { class: "table-container",
                    table {
                        thead {
                            tr {
                                th { "Project" }
                                th { class: "text-right", "Hours" }
                                th { class: "text-right", "Rate" }
                                th { class: "text-right", "Cost" }
                                th { class: "text-right", "Profit" }
                                th { class: "text-right", "Profit %" }
                            }
                        }
                        tbody {
                            for row in list.iter().cloned() {
                                CostRow { key: "{row.project.key}", row, on_open: move |key| open.set(Some(key)) }
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
                    h1 { class: "page-title", "Project Management" }
                    p { class: "page-subtitle", "Logged hours against recorded cost, per project." }
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| rows.restart(),
                        "Refresh"
                    }
                }
            }

            if let Some(key) = open() {
                ProjectDialog { key: "{key}", project_key: key.clone(), on_close: move |_| open.set(None) }
            }

            {body}
        }
    }
}

#[component]
fn CostRow(row: ProjectRow, on_open: EventHandler<String>) -> Element {
    let ProjectRow { project, financials } = row;
    let key = project.key.clone();
    let tone = profit_class(financials.profit);

    rsx! {
        tr { class: "clickable", onclick: move |_| on_open.call(key.clone()),
            td {
                div { "{project.name}" }
                div { class: "text-muted text-sm", "{project.key}" }
            }
            td { class: "text-right", "{hours(financials.hours())}" }
            td { class: "text-right", "{inr(financials.hourly_rate)}" }
            td { class: "text-right", "{inr(financials.total_cost)}" }
            td { class: "text-right {tone}", "{inr(financials.profit)}" }
            td { class: "text-right {tone}", "{percentage(financials.profit_percentage)}" }
        }
    }
}
