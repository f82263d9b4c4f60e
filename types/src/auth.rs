use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{Result, err};

/// Cookie holding the backend's bearer token.
pub const AUTH_COOKIE_NAME: &str = "authToken";

/// Older cookie names still honoured when looking for a token, in order.
pub const FALLBACK_COOKIE_NAMES: [&str; 2] = ["session", "jwt"];

pub const DEFAULT_ADMIN_ROLE: &str = "Admin";

// JWT segments are unpadded, but some issuers pad anyway.
const JWT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims carried in the backend-issued JWT.
///
/// The signature is not checked here: the backend verifies every request it
/// serves, the dashboard only reads the payload to decide what to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub role: String,
    /// Expiry, in seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl TokenClaims {
    pub fn decode(token: &str) -> Result<Self> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_header), Some(payload), Some(_signature), None) => payload,
            _ => return Err(err!("malformed token")),
        };

        let bytes = JWT_ENGINE
            .decode(payload)
            .map_err(|e| err!("invalid token payload encoding: {e}"))?;

        serde_json::from_slice(&bytes).map_err(|e| err!("invalid token claims: {e}"))
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_second() >= self.exp
    }

    pub fn is_admin(&self, admin_role: &str) -> bool {
        self.role == admin_role
    }
}

/// What the browser is told about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
    pub role: String,
    pub is_admin: bool,
}

impl CurrentUser {
    pub fn from_claims(claims: &TokenClaims, admin_role: &str) -> Self {
        Self {
            email: claims.email.clone(),
            role: claims.role.clone(),
            is_admin: claims.is_admin(admin_role),
        }
    }

    /// Single letter shown in the sidebar avatar.
    pub fn initial(&self) -> String {
        self.email
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string()
    }
}
