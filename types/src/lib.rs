pub mod auth;
mod error;
pub mod format;
pub mod forms;
pub mod jira;
pub mod points;
pub mod user;
pub mod worklog;

pub use auth::{AUTH_COOKIE_NAME, CurrentUser, TokenClaims};
pub use error::{Error, Result};
pub use user::{CostOverview, CostSummary, NewUser, User, UserUpdate};

#[doc(hidden)]
pub use anyhow::anyhow as internal_anyhow_dont_use;
