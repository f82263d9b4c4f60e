use cookie::{Cookie, SameSite};
use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use types::{
    AUTH_COOKIE_NAME, Error, Result, TokenClaims,
    auth::FALLBACK_COOKIE_NAMES,
};

const COOKIE_MAX_AGE: cookie::time::Duration = cookie::time::Duration::days(7);

/// A signed-in user: the decoded claims plus the bearer token forwarded to
/// the backend.
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: TokenClaims,
    token: SecretString,
}

impl Session {
    /// Fails with 401 when the token cannot be decoded or has expired.
    pub fn from_token(token: &str, now: Timestamp) -> Result<Self> {
        let claims = TokenClaims::decode(token).map_err(|e| e.with_status(401))?;

        if claims.is_expired_at(now) {
            return Err(Error::unauthorized("session expired, please sign in again"));
        }

        Ok(Self {
            claims,
            token: token.into(),
        })
    }

    pub fn from_cookie_header(header: &str, now: Timestamp) -> Result<Self> {
        let token = find_token(header).ok_or_else(|| Error::unauthorized("not signed in"))?;
        Self::from_token(token.expose_secret(), now)
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

/// The auth token from a `Cookie` header, preferring `authToken` over the
/// legacy names.
pub fn find_token(header: &str) -> Option<SecretString> {
    let cookies: Vec<Cookie<'_>> = Cookie::split_parse(header)
        .filter_map(|cookie| cookie.ok())
        .collect();

    std::iter::once(AUTH_COOKIE_NAME)
        .chain(FALLBACK_COOKIE_NAMES)
        .find_map(|name| {
            cookies
                .iter()
                .find(|c| c.name() == name && !c.value().is_empty())
        })
        .map(|cookie| cookie.value().into())
}

pub(crate) fn auth_cookie(token: &SecretString, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token.expose_secret().to_string()))
        .path("/")
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(COOKIE_MAX_AGE)
        .build()
}

pub(crate) fn cleared_auth_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .build()
}
