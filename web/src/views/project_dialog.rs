use dioxus::prelude::*;
use types::{
    format::{category_badge, date, initials, priority_badge, project_type_badge, status_badge, work_hours},
    jira::{Issue, Project},
    worklog::{issue_seconds, project_seconds, team_members},
};

use super::components::{EmptyState, LoadError, Loading, Modal};
use crate::{error_message, use_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Details,
    Issues,
    Team,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Details, Tab::Issues, Tab::Team];

    fn label(self) -> &'static str {
        match self {
            Tab::Details => "Details",
            Tab::Issues => "Issues",
            Tab::Team => "Team",
        }
    }
}

/// A project with its issues and the people who worked on them.
#[component]
pub fn ProjectDialog(project_key: String, on_close: EventHandler<()>) -> Element {
    let error_state = use_error();
    let mut tab = use_signal(|| Tab::Details);

    let key = project_key.clone();
    let mut project = use_resource(move || {
        let key = key.clone();
        async move {
            let result = api::get_project(key).await;
            if let Err(e) = &result {
                error_state.redirect_if_unauthorized(e);
            }
            result
        }
    });

    let key = project_key.clone();
    let mut issues = use_resource(move || {
        let key = key.clone();
        async move {
            let result = api::project_issues(key).await;
            if let Err(e) = &result {
                error_state.redirect_if_unauthorized(e);
            }
            result
        }
    });

    let title = match &*project.read() {
        Some(Ok(project)) => format!("{} ({})", project.name, project.key),
        _ => project_key.clone(),
    };

    let body = match tab() {
        Tab::Details => match &*project.read() {
            None => rsx! { Loading { label: "Loading project..." } },
            Some(Err(e)) => rsx! {
                LoadError { message: error_message(e), on_retry: move |_| project.restart() }
            },
            Some(Ok(project)) => rsx! { ProjectDetails { project: project.clone() } },
        },
        selected => match &*issues.read() {
            None => rsx! { Loading { label: "Loading issues..." } },
            Some(Err(e)) => rsx! {
                LoadError { message: error_message(e), on_retry: move |_| issues.restart() }
            },
            Some(Ok(page)) if selected == Tab::Issues => rsx! {
                IssueList { issues: page.issues.clone(), total: page.total }
            },
            Some(Ok(page)) => rsx! { TeamList { issues: page.issues.clone() } },
        },
    };

    rsx! {
        Modal { title, on_close,
            div { class: "tabs",
                for t in Tab::ALL {
                    button {
                        class: if tab() == t { "tab active" } else { "tab" },
                        onclick: move |_| tab.set(t),
                        "{t.label()}"
                    }
                }
            }
            div { class: "modal-body", {body} }
        }
    }
}

#[component]
fn ProjectDetails(project: Project) -> Element {
    let category = project.category_name().map(str::to_string);

    rsx! {
        dl { class: "details",
            dt { "Key" }
            dd { "{project.key}" }
            dt { "Type" }
            dd {
                span { class: project_type_badge(&project.project_type_key), "{project.project_type_key}" }
            }
            dt { "Category" }
            dd {
                span {
                    class: category_badge(category.as_deref()),
                    {category.clone().unwrap_or_else(|| "Uncategorized".to_string())}
                }
            }
            if let Some(lead) = &project.lead {
                dt { "Lead" }
                dd { "{lead.display_name}" }
            }
            if let Some(description) = project.description.as_ref().filter(|d| !d.is_empty()) {
                dt { "Description" }
                dd { "{description}" }
            }
            if !project.issue_types.is_empty() {
                dt { "Issue types" }
                dd {
                    for issue_type in &project.issue_types {
                        span { key: "{issue_type.id}", class: "badge badge-gray", "{issue_type.name}" }
                    }
                }
            }
        }
    }
}

#[component]
fn IssueList(issues: Vec<Issue>, total: u64) -> Element {
    if issues.is_empty() {
        return rsx! { EmptyState { title: "No issues in this project" } };
    }

    let logged = work_hours(project_seconds(&issues));

    rsx! {
        p { class: "text-muted", "{total} issues, {logged} logged" }
        div { class: "issue-list",
            for issue in issues {
                div { key: "{issue.id}", class: "card issue-card",
                    div { class: "issue-card-header",
                        span { class: "issue-key", "{issue.key}" }
                        span {
                            class: status_badge(&issue.fields.status.status_category.key),
                            "{issue.fields.status.name}"
                        }
                        if let Some(priority) = &issue.fields.priority {
                            span { class: priority_badge(&priority.name), "{priority.name}" }
                        }
                    }
                    p { class: "issue-summary", "{issue.fields.summary}" }
                    if let Some(text) = issue.description_text() {
                        p { class: "text-muted text-sm", "{text}" }
                    }
                    div { class: "issue-card-footer text-muted text-sm",
                        span { "{issue.fields.issuetype.name}" }
                        span { "Created {date(&issue.fields.created)}" }
                        if let Some(assignee) = &issue.fields.assignee {
                            span { "{assignee.display_name}" }
                        }
                        span { "{work_hours(issue_seconds(&issue))}" }
                    }
                }
            }
        }
    }
}

#[component]
fn TeamList(issues: Vec<Issue>) -> Element {
    let members = team_members(&issues);
    if members.is_empty() {
        return rsx! { EmptyState { title: "No one has worked on this project yet" } };
    }

    rsx! {
        div { class: "team-list",
            for member in members {
                div { key: "{member.account_id}", class: "team-member",
                    if let Some(url) = &member.avatar_url {
                        img { class: "avatar", src: "{url}", alt: "{member.display_name}" }
                    } else {
                        span { class: "avatar", "{initials(&member.display_name)}" }
                    }
                    div { class: "team-member-info",
                        div { "{member.display_name}" }
                        if let Some(email) = &member.email_address {
                            div { class: "text-muted text-sm", "{email}" }
                        }
                        div {
                            for role in member.roles.iter() {
                                span { class: "badge badge-gray", "{role.label()}" }
                            }
                        }
                    }
                    div { class: "text-right",
                        div { "{work_hours(member.work_seconds)}" }
                        div { class: "text-muted text-sm", "{member.issue_count} issues" }
                    }
                }
            }
        }
    }
}
