//! Page-level redirects based on the auth cookie.
//!
//! The guard only looks at whether a usable token is present. Server
//! functions do their own session checks and answer 401/403 instead of
//! redirecting.

use axum::{
    Router,
    extract::Request,
    http::header::{COOKIE, SET_COOKIE},
    middleware::Next,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use jiff::Timestamp;
use secrecy::ExposeSecret;

use crate::session::{Session, cleared_auth_cookie, find_token};

const PROTECTED: [&str; 7] = [
    "/leaderboard",
    "/users",
    "/points",
    "/change-password",
    "/resources",
    "/projects",
    "/project-management",
];

const GUEST_ONLY: [&str; 2] = ["/login", "/register"];

pub const HOME: &str = "/leaderboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Missing,
    Usable,
    /// Present but expired or undecodable.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Pass,
    Login { redirect: String, clear_cookie: bool },
    Home,
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn is_protected(path: &str) -> bool {
    path == "/" || PROTECTED.iter().any(|prefix| matches_prefix(path, prefix))
}

pub fn gate(path: &str, token: TokenState) -> Gate {
    let guest_only = GUEST_ONLY.iter().any(|prefix| matches_prefix(path, prefix));

    match token {
        TokenState::Usable if guest_only => Gate::Home,
        TokenState::Usable => Gate::Pass,
        state if is_protected(path) => Gate::Login {
            redirect: path.to_string(),
            clear_cookie: state == TokenState::Stale,
        },
        _ => Gate::Pass,
    }
}

fn token_state(request: &Request) -> TokenState {
    let header = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");

    match find_token(&header) {
        None => TokenState::Missing,
        Some(token) => match Session::from_token(token.expose_secret(), Timestamp::now()) {
            Ok(_) => TokenState::Usable,
            Err(_) => TokenState::Stale,
        },
    }
}

pub fn login_location(redirect: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", redirect)
        .finish();
    format!("/login?{query}")
}

async fn route_guard(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    match gate(&path, token_state(&request)) {
        Gate::Pass => next.run(request).await,
        Gate::Home => {
            tracing::debug!(%path, "already signed in, redirecting home");
            Redirect::to(HOME).into_response()
        }
        Gate::Login {
            redirect,
            clear_cookie,
        } => {
            tracing::debug!(%path, clear_cookie, "not signed in, redirecting to login");
            let cookies = clear_cookie
                .then(|| (SET_COOKIE, cleared_auth_cookie().to_string()))
                .into_iter();
            (AppendHeaders(cookies), Redirect::to(&login_location(&redirect))).into_response()
        }
    }
}

/// Wrap the whole app router so page requests are checked before rendering.
pub fn guarded(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(route_guard))
}
