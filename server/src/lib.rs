mod auth_routes;
mod backend;
mod config;
mod guard;
mod session;

use std::sync::OnceLock;

use axum::Router;
use axum::http::{HeaderMap, header::COOKIE};
use dioxus::fullstack::FullstackContext;
use jiff::Timestamp;
use tracing_subscriber::EnvFilter;
use types::{CurrentUser, Error, Result, err};

pub use crate::backend::{AuthGrant, BackendClient, UserClient, backend_message};
pub use crate::config::Config;
pub use crate::guard::{Gate, TokenState, gate, guarded, is_protected};
pub use crate::session::{Session, find_token};
pub use secrecy::SecretString;

static CONFIG: OnceLock<Config> = OnceLock::new();
static BACKEND: OnceLock<BackendClient> = OnceLock::new();

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,server=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load configuration and return the `/auth` routes. Must run before any
/// server function is served.
pub async fn init() -> anyhow::Result<Router> {
    let config = Config::load()?;
    tracing::info!(api_url = %config.api_url, admin_role = %config.admin_role, "starting");

    let backend = BACKEND.get_or_init(|| BackendClient::new(config.api_url.clone()));
    let config = CONFIG.get_or_init(|| config);

    Ok(auth_routes::auth_router(auth_routes::AuthState {
        config: config.clone(),
        backend: backend.clone(),
    }))
}

pub fn config() -> Result<&'static Config> {
    CONFIG.get().ok_or_else(|| err!("server is not initialised"))
}

pub fn backend() -> Result<&'static BackendClient> {
    BACKEND.get().ok_or_else(|| err!("server is not initialised"))
}

/// Extract the user session from the request cookie.
pub async fn get_session_from_cookie() -> Result<Session> {
    let headers: HeaderMap = FullstackContext::extract().await?;

    let cookies = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");

    Session::from_cookie_header(&cookies, Timestamp::now())
}

/// Any signed-in user. 401 otherwise.
pub async fn require_session() -> Result<Session> {
    get_session_from_cookie().await.inspect_err(|error| {
        tracing::debug!(%error, "rejected request without a session");
    })
}

/// Require an authenticated admin session, returning the session if valid.
pub async fn require_admin_session() -> Result<Session> {
    let session = require_session().await?;
    ensure_admin(session, &config()?.admin_role)
}

/// 403 unless the session carries `admin_role`.
fn ensure_admin(session: Session, admin_role: &str) -> Result<Session> {
    if !session.claims.is_admin(admin_role) {
        tracing::info!(email = %session.claims.email, "non-admin called an admin operation");
        return Err(Error::forbidden(format!(
            "access denied: '{}' must have the '{}' role",
            session.claims.email, admin_role
        )));
    }

    Ok(session)
}

/// The signed-in user as the browser sees them, if any.
pub async fn current_user() -> Result<Option<CurrentUser>> {
    let admin_role = &config()?.admin_role;

    Ok(get_session_from_cookie()
        .await
        .ok()
        .map(|session| CurrentUser::from_claims(&session.claims, admin_role)))
}
