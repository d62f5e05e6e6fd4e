//! Driver connection string.

use crate::config::{DatabaseConfig, resolve_env};
use crate::duration::format_duration;
use std::fmt;
use std::time::Duration;

/// Connection string handed to a [`Connector`](super::Connector):
///
/// ```text
/// <user>:<password>@tcp(<host>)/<dbname>?charset=utf8&parseTime=True[&readTimeout=..][&writeTimeout=..][&timeout=..]
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Dsn {
    pub user: String,
    pub password: String,
    pub host: String,
    pub name: String,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
}

impl Dsn {
    /// Build from configuration. `password` and `host` go through
    /// [`resolve_env`] so they can name an environment variable.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            user: config.user.clone(),
            password: resolve_env(&config.password),
            host: resolve_env(&config.host),
            name: config.name.clone(),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
            timeout: config.timeout,
        }
    }

    /// The connection string with the password hidden, for logs.
    pub fn masked(&self) -> String {
        self.render("****")
    }

    fn render(&self, password: &str) -> String {
        let mut out = format!(
            "{}:{}@tcp({})/{}?charset=utf8&parseTime=True",
            self.user, password, self.host, self.name
        );
        if let Some(d) = self.read_timeout {
            out.push_str("&readTimeout=");
            out.push_str(&format_duration(d));
        }
        if let Some(d) = self.write_timeout {
            out.push_str("&writeTimeout=");
            out.push_str(&format_duration(d));
        }
        if let Some(d) = self.timeout {
            out.push_str("&timeout=");
            out.push_str(&format_duration(d));
        }
        out
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&self.password))
    }
}

impl fmt::Debug for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dsn").field(&self.masked()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            driver: "mysql".into(),
            host: "db:3306".into(),
            name: "api".into(),
            user: "svc".into(),
            password: "secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn renders_base_connection_string() {
        let dsn = Dsn::from_config(&config());
        assert_eq!(dsn.to_string(), "svc:secret@tcp(db:3306)/api?charset=utf8&parseTime=True");
    }

    #[test]
    fn appends_timeouts_in_fixed_order() {
        let cfg = config()
            .timeout(Duration::from_secs(1))
            .write_timeout(Duration::from_millis(1500))
            .read_timeout(Duration::from_secs(90));
        assert_eq!(
            Dsn::from_config(&cfg).to_string(),
            "svc:secret@tcp(db:3306)/api?charset=utf8&parseTime=True\
             &readTimeout=1m30s&writeTimeout=1.5s&timeout=1s"
        );
    }

    #[test]
    fn appends_only_configured_timeouts() {
        let cfg = config().timeout(Duration::from_secs(1)).write_timeout(Duration::from_secs(1));
        assert_eq!(
            Dsn::from_config(&cfg).to_string(),
            "svc:secret@tcp(db:3306)/api?charset=utf8&parseTime=True&writeTimeout=1s&timeout=1s"
        );
    }

    #[test]
    fn masks_password_for_logs() {
        let dsn = Dsn::from_config(&config());
        assert_eq!(dsn.masked(), "svc:****@tcp(db:3306)/api?charset=utf8&parseTime=True");
        assert!(!format!("{dsn:?}").contains("secret"));
    }

    #[test]
    fn resolves_host_and_password_from_env() {
        // SAFETY: variable names are unique to this test.
        unsafe {
            std::env::set_var("SQLKIT_DSN_TEST_HOST", "10.0.0.5:3306");
            std::env::set_var("SQLKIT_DSN_TEST_PASSWORD", "hunter2");
        }
        let cfg = DatabaseConfig {
            host: "SQLKIT_DSN_TEST_HOST".into(),
            password: "SQLKIT_DSN_TEST_PASSWORD".into(),
            user: "SQLKIT_DSN_TEST_HOST".into(),
            ..config()
        };
        assert_eq!(
            Dsn::from_config(&cfg).to_string(),
            "SQLKIT_DSN_TEST_HOST:hunter2@tcp(10.0.0.5:3306)/api?charset=utf8&parseTime=True"
        );
    }
}
