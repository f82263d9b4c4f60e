use dioxus::prelude::*;
use types::forms::FieldErrors;

#[component]
pub fn Modal(
    title: String,
    on_close: EventHandler<()>,
    #[props(default)] busy: bool,
    #[props(default)] small: bool,
    children: Element,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| if !busy { on_close.call(()) },
            div { class: if small { "modal modal-sm" } else { "modal" },
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    if !busy {
                        button {
                            class: "modal-close",
                            onclick: move |_| on_close.call(()),
                            "×"
                        }
                    }
                }
                {children}
            }
        }
    }
}

#[component]
pub fn Loading(label: String) -> Element {
    rsx! {
        div { class: "loading", "{label}" }
    }
}

#[component]
pub fn EmptyState(title: String, #[props(default)] detail: Option<String>) -> Element {
    rsx! {
        div { class: "empty-state",
            p { class: "empty-state-title", "{title}" }
            if let Some(detail) = detail {
                p { class: "text-muted", "{detail}" }
            }
        }
    }
}

/// Inline failure for a page's data, optionally with a retry button.
#[component]
pub fn LoadError(message: String, #[props(default)] on_retry: Option<EventHandler<()>>) -> Element {
    rsx! {
        div { class: "alert alert-error",
            span { "{message}" }
            if let Some(on_retry) = on_retry {
                button {
                    class: "btn btn-secondary btn-sm",
                    onclick: move |_| on_retry.call(()),
                    "Retry"
                }
            }
        }
    }
}

#[component]
pub fn FieldError(errors: FieldErrors, field: String) -> Element {
    match errors.get(&field) {
        Some(message) => rsx! {
            p { class: "form-error", "{message}" }
        },
        None => rsx! {},
    }
}

/// Admin pages render this for everyone else.
#[component]
pub fn AdminOnly() -> Element {
    rsx! {
        div { class: "card",
            div { class: "card-body",
                h2 { class: "card-title", "Administrators only" }
                p { class: "text-muted", "You do not have access to this page." }
            }
        }
    }
}
