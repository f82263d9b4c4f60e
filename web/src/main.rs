use dioxus::prelude::*;

mod views;

use types::CurrentUser;
use views::{
    ChangePassword, Leaderboard, Login, Points, ProjectManagement, Projects, Resources, Users,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login?:error&:redirect")]
    Login { error: Option<String>, redirect: Option<String> },
    #[redirect("/", || Route::Leaderboard {})]
    #[layout(AuthenticatedLayout)]
        #[route("/leaderboard")]
        Leaderboard {},
        #[route("/users")]
        Users {},
        #[route("/points")]
        Points {},
        #[route("/resources")]
        Resources {},
        #[route("/projects")]
        Projects {},
        #[route("/project-management")]
        ProjectManagement {},
        #[route("/change-password")]
        ChangePassword {},
}

impl Route {
    pub fn login(error: Option<String>) -> Self {
        Route::Login {
            error,
            redirect: None,
        }
    }
}

fn main() {
    #[cfg(feature = "server")]
    {
        server::init_tracing();
        dioxus::serve(|| async move {
            let routes = server::init().await?;

            Ok(server::guarded(dioxus::server::router(App).merge(routes)))
        });
    }

    #[cfg(all(feature = "web", not(feature = "server")))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Tally" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}

#[component]
fn NavLink(to: Route, children: Element) -> Element {
    let current_route: Route = use_route();
    let is_active = current_route == to;

    rsx! {
        Link {
            to,
            class: if is_active { "active" },
            {children}
        }
    }
}

/// Structured error information for display
#[derive(Clone, Debug, Default)]
pub struct ErrorInfo {
    pub message: String,
    pub chain: Vec<String>,
    pub backtrace: Option<String>,
}

impl ErrorInfo {
    /// Parse a ServerFnError to extract structured error info
    pub fn from_server_error(err: &ServerFnError) -> Self {
        match err {
            ServerFnError::ServerError {
                message, details, ..
            } => {
                let chain = details
                    .as_ref()
                    .and_then(|d| d.get("chain"))
                    .and_then(|c| c.as_array())
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str().map(String::from))
                            .collect()
                    })
                    .unwrap_or_else(|| vec![message.clone()]);
                let backtrace = details
                    .as_ref()
                    .and_then(|d| d.get("backtrace"))
                    .and_then(|b| b.as_str())
                    .map(String::from);

                Self {
                    message: message.clone(),
                    chain,
                    backtrace,
                }
            }
            other => Self {
                message: other.to_string(),
                chain: vec![other.to_string()],
                backtrace: None,
            },
        }
    }
}

/// The user-facing message of a failed server call.
pub fn error_message(err: &ServerFnError) -> String {
    ErrorInfo::from_server_error(err).message
}

/// Logout clears the cookie, then shows `message` on the login page.
fn signed_out_location(message: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("error", message)
        .finish();
    format!("/auth/logout?{query}")
}

/// Global error state - use `use_error()` to access
#[derive(Clone, Copy)]
pub struct ErrorState(Signal<Option<ErrorInfo>>);

impl ErrorState {
    /// Sends the user to the login page if the session is gone, clearing the
    /// cookie on the way. Returns whether it did.
    pub fn redirect_if_unauthorized(&self, err: &ServerFnError) -> bool {
        if let ServerFnError::ServerError {
            code: 401, message, ..
        } = err
        {
            let target: NavigationTarget = NavigationTarget::External(signed_out_location(message));
            navigator().push(target);
            return true;
        }
        false
    }

    pub fn set_server_error(&mut self, err: &ServerFnError) {
        if self.redirect_if_unauthorized(err) {
            return;
        }
        self.0.set(Some(ErrorInfo::from_server_error(err)));
    }

    pub fn clear(&mut self) {
        self.0.set(None);
    }
}

/// Get the global error state for setting/clearing errors
pub fn use_error() -> ErrorState {
    use_context::<ErrorState>()
}

/// The signed-in user, provided by the authenticated layout.
pub fn use_current_user() -> CurrentUser {
    use_context::<CurrentUser>()
}

const OWN_CRATES: [&str; 4] = ["types::", "server::", "api::", "web::"];

/// Filter backtrace to only show lines from this codebase
fn filter_backtrace(backtrace: &str) -> String {
    backtrace
        .lines()
        .filter(|line| OWN_CRATES.iter().any(|name| line.contains(name)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[component]
fn ErrorBanner() -> Element {
    let mut error_state = use_context::<ErrorState>();
    let error = error_state.0.read();

    let Some(err) = error.as_ref() else {
        return rsx! {};
    };

    let has_chain = err.chain.len() > 1;
    let filtered_backtrace = err
        .backtrace
        .as_ref()
        .map(|bt| filter_backtrace(bt))
        .filter(|bt| !bt.is_empty());

    rsx! {
        div { class: "error-banner",
            div { class: "error-banner-content",
                div { class: "error-banner-header",
                    span { class: "error-banner-message", "{err.message}" }
                    div { class: "error-banner-actions",
                        button {
                            class: "error-banner-close",
                            onclick: move |_| error_state.clear(),
                            "×"
                        }
                    }
                }
                if has_chain || filtered_backtrace.is_some() {
                    div { class: "error-details",
                        if has_chain {
                            div { class: "error-chain",
                                h4 { class: "error-section-title", "Error Chain" }
                                ol { class: "error-chain-list",
                                    for (i, msg) in err.chain.iter().enumerate() {
                                        li {
                                            key: "{i}",
                                            class: "error-chain-item",
                                            "{msg}"
                                        }
                                    }
                                }
                            }
                        }
                        if let Some(backtrace) = &filtered_backtrace {
                            div { class: "error-backtrace",
                                h4 { class: "error-section-title", "Backtrace" }
                                pre { class: "error-backtrace-content", "{backtrace}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AuthenticatedLayout() -> Element {
    use_context_provider(|| ErrorState(Signal::new(None)));
    let user = use_server_future(api::get_current_user)?;

    match &*user.read() {
        Some(Ok(Some(current))) => rsx! {
            Shell { user: current.clone() }
        },
        Some(Ok(None)) | Some(Err(_)) => {
            navigator().push(Route::login(None));
            rsx! {
                div { class: "loading", "Redirecting to login..." }
            }
        }
        None => rsx! {
            div { class: "loading", "Loading..." }
        },
    }
}

#[component]
fn Shell(user: CurrentUser) -> Element {
    use_context_provider(|| user.clone());
    let initial = user.initial();

    rsx! {
        div { class: "app-layout",
            aside { class: "sidebar",
                div { class: "sidebar-header",
                    span { class: "sidebar-logo", "Tally" }
                }
                nav { class: "sidebar-nav",
                    NavLink { to: Route::Leaderboard {}, "Leaderboard" }
                    NavLink { to: Route::Users {}, "Users" }
                    if user.is_admin {
                        NavLink { to: Route::Points {}, "Points" }
                        NavLink { to: Route::Resources {}, "Resources" }
                        NavLink { to: Route::Projects {}, "Projects" }
                        NavLink { to: Route::ProjectManagement {}, "Project Management" }
                    }
                }
                div { class: "sidebar-footer",
                    div { class: "sidebar-user",
                        div { class: "sidebar-avatar", "{initial}" }
                        div { class: "sidebar-user-info",
                            div { class: "sidebar-user-name", "{user.email}" }
                            div { class: "sidebar-user-role", "{user.role}" }
                        }
                    }
                    Link { to: Route::ChangePassword {}, class: "sidebar-link", "Change password" }
                    a { href: "/auth/logout", rel: "external", class: "sidebar-logout", "Sign out" }
                }
            }
            main { class: "main-content",
                ErrorBanner {}
                Outlet::<Route> {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_workspace_frames() {
        let backtrace = "  0: std::backtrace::Backtrace::capture\n  \
                         1: server::backend::UserClient::list_users\n  \
                         2: tokio::runtime::task::raw::poll\n  \
                         3: api::list_users";

        assert_eq!(
            filter_backtrace(backtrace),
            "  1: server::backend::UserClient::list_users\n  3: api::list_users"
        );
    }

    #[test]
    fn error_info_reads_chain_details() {
        let err = ServerFnError::ServerError {
            message: "Failed to fetch users".into(),
            code: 502,
            details: Some(serde_json::json!({
                "chain": ["Failed to fetch users", "connection refused"],
                "backtrace": null,
            })),
        };

        let info = ErrorInfo::from_server_error(&err);
        assert_eq!(info.message, "Failed to fetch users");
        assert_eq!(info.chain.len(), 2);
        assert_eq!(info.backtrace, None);
    }

    #[test]
    fn expired_session_goes_through_logout() {
        assert_eq!(
            signed_out_location("session expired, please sign in again"),
            "/auth/logout?error=session+expired%2C+please+sign+in+again"
        );
    }

    #[test]
    fn error_info_without_details() {
        let err = ServerFnError::ServerError {
            message: "boom".into(),
            code: 500,
            details: None,
        };
        assert_eq!(ErrorInfo::from_server_error(&err).chain, vec!["boom"]);
    }
}
