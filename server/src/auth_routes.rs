use axum::{
    Form, Router,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use types::{Error, TokenClaims, forms::LoginForm};

use crate::{
    BackendClient, Config,
    guard::HOME,
    session::{auth_cookie, cleared_auth_cookie},
};

const CHANGE_PASSWORD: &str = "/change-password";

/// What the login handler needs from the running server.
#[derive(Clone)]
pub struct AuthState {
    pub config: Config,
    pub backend: BackendClient,
}

pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: SecretString,
    #[serde(default)]
    redirect: Option<String>,
}

/// Only same-site paths; anything else falls back to the leaderboard.
fn safe_redirect(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => HOME,
    }
}

fn login_error_location(message: &str, redirect: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("error", message);
    if let Some(redirect) = redirect {
        query.append_pair("redirect", redirect);
    }
    format!("/login?{}", query.finish())
}

async fn login(State(state): State<AuthState>, Form(request): Form<LoginRequest>) -> Response {
    match login_inner(&state, &request).await {
        Ok(response) => response,
        Err(error) => {
            tracing::info!(email = %request.email, %error, "login failed");
            Redirect::to(&login_error_location(
                &error.message,
                request.redirect.as_deref(),
            ))
            .into_response()
        }
    }
}

async fn login_inner(state: &AuthState, request: &LoginRequest) -> types::Result<Response> {
    let form = LoginForm {
        email: request.email.clone(),
        password: request.password.expose_secret().to_string(),
    };
    if let Some((_, message)) = form.validate().iter().next() {
        return Err(Error::new(message));
    }

    let config = &state.config;
    let grant = state
        .backend
        .authenticate(request.email.trim(), &request.password)
        .await?;

    // The guard would bounce a token it cannot read straight back here.
    let claims = TokenClaims::decode(grant.token.expose_secret())
        .map_err(|_| Error::new("Authentication failed"))?;
    tracing::info!(email = %claims.email, role = %claims.role, "login succeeded");

    let target = if config.is_default_password(&request.password) {
        CHANGE_PASSWORD
    } else {
        safe_redirect(request.redirect.as_deref())
    };

    let cookie = auth_cookie(&grant.token, config.secure_cookies);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Redirect::to(target),
    )
        .into_response())
}

#[derive(Deserialize)]
struct LogoutParams {
    #[serde(default)]
    error: Option<String>,
}

/// Also used when the browser finds its session gone; `error` is carried
/// through to the login page.
async fn logout(Query(params): Query<LogoutParams>) -> impl IntoResponse {
    let location = match params.error.as_deref().filter(|e| !e.is_empty()) {
        Some(message) => login_error_location(message, None),
        None => "/login".to_string(),
    };

    (
        AppendHeaders([(SET_COOKIE, cleared_auth_cookie().to_string())]),
        Redirect::to(&location),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::token;
    use axum::{Json, http::StatusCode};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some("/points"), "/points")]
    #[case(Some("/projects/ACME?tab=team"), "/projects/ACME?tab=team")]
    #[case(Some("https://evil.example"), HOME)]
    #[case(Some("//evil.example"), HOME)]
    #[case(Some("/\\evil.example"), HOME)]
    #[case(Some(""), HOME)]
    #[case(None, HOME)]
    fn redirect_targets(#[case] target: Option<&str>, #[case] expected: &str) {
        assert_eq!(safe_redirect(target), expected);
    }

    #[test]
    fn error_location_keeps_redirect() {
        assert_eq!(
            login_error_location("Invalid credentials", Some("/users")),
            "/login?error=Invalid+credentials&redirect=%2Fusers"
        );
        assert_eq!(
            login_error_location("Email is required", None),
            "/login?error=Email+is+required"
        );
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let response = logout(Query(LogoutParams { error: None }))
            .await
            .into_response();

        assert_eq!(response.headers()["location"], "/login");
        let cookie = response.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn logout_forwards_error() {
        let response = logout(Query(LogoutParams {
            error: Some("session expired".into()),
        }))
        .await
        .into_response();

        assert_eq!(
            response.headers()["location"],
            "/login?error=session+expired"
        );
        assert!(response.headers().contains_key("set-cookie"));
    }

    const DEFAULT_PASSWORD: &str = "welcome123";

    async fn listen(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    /// The auth routes in front of a backend that accepts `asha@example.com`
    /// with `hunter22` or the default password.
    async fn serve() -> String {
        let backend = listen(Router::new().route(
            "/api/users/auth",
            post(|Json(body): Json<serde_json::Value>| async move {
                let password = body["password"].as_str().unwrap_or_default();
                if body["email"] == "asha@example.com"
                    && (password == "hunter22" || password == DEFAULT_PASSWORD)
                {
                    Ok(Json(json!({ "token": token("Admin", i64::MAX) })))
                } else {
                    Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))))
                }
            }),
        ))
        .await;

        let config = Config::from_toml(&format!(
            "api_url = \"{backend}/api/\"\ndefault_password = \"{DEFAULT_PASSWORD}\""
        ))
        .unwrap();
        let state = AuthState {
            backend: BackendClient::new(config.api_url.clone()),
            config,
        };
        listen(auth_router(state)).await
    }

    async fn submit(base: &str, email: &str, password: &str) -> reqwest::Response {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
            .post(format!("{base}/auth/login"))
            .form(&[("email", email), ("password", password), ("redirect", "/points")])
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn wrong_password_returns_to_login_without_cookie() {
        let base = serve().await;

        let response = submit(&base, "asha@example.com", "nope").await;

        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers()["location"],
            "/login?error=Invalid+credentials&redirect=%2Fpoints"
        );
        assert!(!response.headers().contains_key("set-cookie"));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let base = serve().await;

        let response = submit(&base, "asha", "hunter22").await;

        assert_eq!(
            response.headers()["location"],
            "/login?error=Email+is+invalid&redirect=%2Fpoints"
        );
        assert!(!response.headers().contains_key("set-cookie"));
    }

    #[tokio::test]
    async fn successful_login_sets_cookie() {
        let base = serve().await;

        let response = submit(&base, "asha@example.com", "hunter22").await;

        assert_eq!(response.headers()["location"], "/points");
        let cookie = response.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("authToken=e30."));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[tokio::test]
    async fn default_password_forces_change() {
        let base = serve().await;

        let response = submit(&base, "asha@example.com", DEFAULT_PASSWORD).await;

        assert_eq!(response.headers()["location"], CHANGE_PASSWORD);
        assert!(response.headers().contains_key("set-cookie"));
    }
}
