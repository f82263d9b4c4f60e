use dioxus::prelude::*;
use types::{
    User,
    points::{Aspect, PointsDraft},
};

use super::components::{AdminOnly, EmptyState, LoadError, Loading, Modal};
use crate::{error_message, use_current_user, use_error};

#[component]
pub fn Points() -> Element {
    if !use_current_user().is_admin {
        return rsx! { AdminOnly {} };
    }

    rsx! { PointsBoard {} }
}

#[component]
fn PointsBoard() -> Element {
    let error_state = use_error();
    let mut selected = use_signal(|| None::<User>);

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
            EmptyState { title: "No users to award points to" }
        },
        Some(Ok(list)) => rsx! {
            div { class: "card-grid",
                for user in list.iter().cloned() {
                    div { key: "{user.id}", class: "card user-card",
                        div { class: "card-body",
                            h3 { class: "card-title", "{user.name}" }
                            p { class: "text-muted", "{user.email}" }
                            p { class: "text-muted", "{user.department}" }
                            div { class: "user-card-footer",
                                span { class: "points", "{user.total_points} pts" }
                                button {
                                    class: "btn btn-primary btn-sm",
                                    onclick: move |_| selected.set(Some(user.clone())),
                                    "Add Points"
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
                    h1 { class: "page-title", "Points Management" }
                    p { class: "page-subtitle", "Award or deduct points against the rubric." }
                }
            }

            if let Some(user) = selected() {
                PointsDialog {
                    user,
                    on_close: move |_| selected.set(None),
                    on_awarded: move |_| {
                        selected.set(None);
                        users.restart();
                    },
                }
            }

            {body}
        }
    }
}

#[component]
fn PointsDialog(user: User, on_close: EventHandler<()>, on_awarded: EventHandler<()>) -> Element {
    let mut error_state = use_error();
    let mut draft = use_signal(PointsDraft::default);
    let mut saving = use_signal(|| false);

    let current = draft.read().clone();
    let aspect = current.aspect();
    let selected = current.selected();
    let can_submit = current.can_submit() && !saving();
    let user_id = user.id.clone();

    rsx! {
        Modal {
            title: "Add Points for {user.name}",
            on_close: move |_| {
                draft.write().reset();
                on_close.call(());
            },
            busy: saving(),
            div { class: "modal-body",
                div { class: "form-group",
                    label { class: "form-label", r#for: "aspect", "Aspect" }
                    select {
                        id: "aspect",
                        class: "form-input",
                        value: aspect.map(|a| a.id()).unwrap_or_default(),
                        onchange: move |e| draft.write().set_aspect(Aspect::from_id(&e.value())),
                        option { value: "", "Select an aspect" }
                        for a in Aspect::ALL {
                            option { value: a.id(), "{a.label()}" }
                        }
                    }
                }

                if let Some(aspect) = aspect {
                    fieldset { class: "form-group option-list",
                        legend { class: "form-label", "{aspect.label()} options" }
                        for choice in aspect.options() {
                            label { key: "{choice.id}", class: "radio-label",
                                input {
                                    r#type: "radio",
                                    name: "points-option",
                                    value: choice.id,
                                    checked: selected.is_some_and(|s| s.id == choice.id),
                                    onchange: move |_| draft.write().set_option(choice.id),
                                }
                                span { class: "text-sm", "{choice.description}" }
                            }
                        }
                    }
                }

                div { class: "form-group",
                    label { class: "form-label", r#for: "points", "Points" }
                    input {
                        id: "points",
                        class: "form-input",
                        r#type: "number",
                        step: "1",
                        placeholder: "e.g. 10 or -5",
                        value: "{current.value()}",
                        oninput: move |e| draft.write().set_value(e.value()),
                    }
                }

                if let Some(reason) = selected {
                    div { class: "selected-option",
                        span { class: "form-label", "Reason" }
                        p { class: "text-sm", "{reason.description}" }
                    }
                }
            }
            div { class: "modal-footer",
                button {
                    class: "btn btn-secondary",
                    disabled: saving(),
                    onclick: move |_| {
                        draft.write().reset();
                        on_close.call(());
                    },
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    disabled: !can_submit,
                    onclick: move |_| {
                        let Some(award) = draft.read().award(&user_id) else {
                            return;
                        };
                        spawn(async move {
                            saving.set(true);
                            let result = api::add_points(award).await;
                            saving.set(false);
                            match result {
                                Ok(()) => {
                                    draft.write().reset();
                                    on_awarded.call(());
                                }
                                Err(e) => error_state.set_server_error(&e),
                            }
                        });
                    },
                    if saving() { "Saving..." } else { "Add Points" }
                }
            }
        }
    }
}
