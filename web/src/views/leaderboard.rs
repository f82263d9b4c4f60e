use dioxus::prelude::*;
use types::points::leaderboard;

use super::components::{EmptyState, Loading, LoadError};
use crate::{error_message, use_error};

#[component]
pub fn Leaderboard() -> Element {
    let error_state = use_error();
    let mut users = use_resource(move || async move {
        let result = api::list_users().await;
        if let Err(e) = &result {
            error_state.redirect_if_unauthorized(e);
        }
        result
    });

    let body = match &*users.read() {
        None => rsx! { Loading { label: "Loading leaderboard..." } },
        Some(Err(e)) => rsx! {
            LoadError { message: error_message(e), on_retry: move |_| users.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { title: "No users yet", detail: "Points will show up here once users are added." }
        },
        Some(Ok(list)) => {
            let standings = leaderboard(list.clone());
            rsx! {
                div { class: "card",
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    th { "Rank" }
                                    th { "Name" }
                                    th { "Department" }
                                    th { class: "text-right", "Points" }
                                }
                            }
                            tbody {
                                for standing in standings {
                                    tr {
                                        key: "{standing.user.id}",
                                        class: if standing.medal().is_some() { "podium" },
                                        td {
                                            if let Some(medal) = standing.medal() {
                                                span { class: "medal", title: medal.label(), "{medal.emoji()}" }
                                            } else {
                                                span { class: "rank", "#{standing.rank}" }
                                            }
                                        }
                                        td { "{standing.user.name}" }
                                        td { class: "text-muted", "{standing.user.department}" }
                                        td { class: "text-right points", "{standing.user.total_points}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Leaderboard" }
                    p { class: "page-subtitle", "Everyone ranked by the points they have earned." }
                }
            }
            {body}
        }
    }
}
