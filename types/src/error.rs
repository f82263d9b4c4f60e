use serde::{Deserialize, Serialize};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A serializable error for client rendering.
///
/// When `RUST_BACKTRACE=1` is set, errors built from an `anyhow` report also
/// carry the captured backtrace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub message: String,
    /// Outermost cause first.
    #[serde(default)]
    pub chain: Vec<String>,
    #[serde(default)]
    pub backtrace: Option<String>,
    /// HTTP status the error should surface as. `None` means 500.
    #[serde(default)]
    pub status: Option<u16>,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            chain: vec![message.clone()],
            message,
            backtrace: None,
            status: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message).with_status(401)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message).with_status(403)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn status(&self) -> u16 {
        self.status.unwrap_or(500)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl<E> From<E> for Error
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        let report: anyhow::Error = error.into();
        let backtrace = report.backtrace();
        let backtrace = (backtrace.status() == std::backtrace::BacktraceStatus::Captured)
            .then(|| backtrace.to_string());

        Self {
            message: report.to_string(),
            chain: report.chain().map(|cause| cause.to_string()).collect(),
            backtrace,
            status: None,
        }
    }
}

#[cfg(feature = "server")]
impl From<Error> for dioxus::server::ServerFnError {
    fn from(error: Error) -> Self {
        let code = error.status();
        let details = serde_json::json!({
            "chain": error.chain,
            "backtrace": error.backtrace,
        });

        dioxus::server::ServerFnError::ServerError {
            message: error.message,
            code,
            details: Some(details),
        }
    }
}

/// Build an [`Error`] from a format string, like `anyhow!`.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from($crate::internal_anyhow_dont_use!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_lists_every_cause() {
        let report = anyhow::anyhow!("socket closed").context("failed to fetch users");
        let error = Error::from(report);

        assert_eq!(error.message, "failed to fetch users");
        assert_eq!(error.chain, vec!["failed to fetch users", "socket closed"]);
        assert_eq!(error.status(), 500);
    }

    #[test]
    fn status_helpers() {
        assert!(Error::unauthorized("token expired").is_unauthorized());
        assert_eq!(Error::forbidden("admins only").status(), 403);
        assert!(!crate::err!("boom {}", 1).is_unauthorized());
    }
}
