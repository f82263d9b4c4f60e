use config::{Environment, File, FileFormat, builder::DefaultState};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use types::auth::DEFAULT_ADMIN_ROLE;
use url::Url;

/// Server settings, read from an optional `tally.toml` and `TALLY_*`
/// environment variables (which win).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the REST backend.
    pub api_url: Url,
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Rate charged per logged hour when working out project profit.
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
    /// Signing in with this password sends the user to change it.
    #[serde(default)]
    pub default_password: Option<SecretString>,
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_admin_role() -> String {
    DEFAULT_ADMIN_ROLE.to_string()
}

fn default_hourly_rate() -> f64 {
    200.0
}

type Builder = config::ConfigBuilder<DefaultState>;

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::build(
            config::Config::builder()
                .add_source(File::with_name("tally").required(false))
                .add_source(Environment::with_prefix("TALLY").try_parsing(true)),
        )
    }

    pub fn from_toml(toml: &str) -> anyhow::Result<Self> {
        Self::build(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: Builder) -> anyhow::Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;

        if config.hourly_rate < 0.0 {
            anyhow::bail!("hourly_rate must not be negative");
        }

        Ok(config)
    }

    pub fn is_default_password(&self, password: &SecretString) -> bool {
        self.default_password
            .as_ref()
            .is_some_and(|default| default.expose_secret() == password.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = Config::from_toml(r#"api_url = "http://localhost:5000/api""#).unwrap();

        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.admin_role, "Admin");
        assert_eq!(config.hourly_rate, 200.0);
        assert!(config.default_password.is_none());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn reads_every_key() {
        let config = Config::from_toml(
            r#"
            api_url = "https://backend.internal/"
            admin_role = "Manager"
            hourly_rate = 350
            default_password = "welcome123"
            secure_cookies = true
            "#,
        )
        .unwrap();

        assert_eq!(config.admin_role, "Manager");
        assert_eq!(config.hourly_rate, 350.0);
        assert!(config.secure_cookies);
        assert!(config.is_default_password(&"welcome123".into()));
        assert!(!config.is_default_password(&"something-else".into()));
    }

    #[test]
    fn api_url_is_required() {
        assert!(Config::from_toml("admin_role = \"Admin\"").is_err());
        assert!(Config::from_toml(r#"api_url = "not a url""#).is_err());
    }

    #[test]
    fn rejects_negative_rate() {
        let toml = "api_url = \"http://localhost\"\nhourly_rate = -1.0";
        assert!(Config::from_toml(toml).is_err());
    }
}
