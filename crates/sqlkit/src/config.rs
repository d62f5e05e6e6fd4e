//! Service configuration loading.
//!
//! The service reads `config/<env>.yml` from its working directory. Only the
//! `database` section is interpreted here; other sections are ignored.

use crate::error::{DbError, DbResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry budget applied when `max_connection_retries` is unset or not positive.
pub const DEFAULT_MAX_CONNECTION_RETRIES: u32 = 3;

/// Whole configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load and parse a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DbError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&raw).map_err(|e| {
            DbError::config(format!("failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Load `<base_dir>/config/<env>.yml`.
    pub fn load_env(base_dir: impl AsRef<Path>, env: &str) -> DbResult<Self> {
        Self::load(config_path(base_dir, env))
    }
}

/// Path of the configuration file for an environment.
pub fn config_path(base_dir: impl AsRef<Path>, env: &str) -> PathBuf {
    base_dir.as_ref().join("config").join(format!("{env}.yml"))
}

/// Database section of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub driver: String,
    /// `host[:port]`, or the name of an environment variable holding it
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: String,
    /// Password, or the name of an environment variable holding it
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "connection_max_life_time_seconds")]
    pub conn_max_lifetime_secs: u64,
    #[serde(
        default,
        rename = "connection_read_timeout",
        deserialize_with = "crate::duration::option::deserialize"
    )]
    pub read_timeout: Option<Duration>,
    #[serde(
        default,
        rename = "connection_write_timeout",
        deserialize_with = "crate::duration::option::deserialize"
    )]
    pub write_timeout: Option<Duration>,
    #[serde(
        default,
        rename = "connection_timeout",
        deserialize_with = "crate::duration::option::deserialize"
    )]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub max_connection_retries: i64,
    #[serde(default, rename = "max_idle_connections_per_host")]
    pub max_idle_conns: usize,
    #[serde(default, rename = "max_open_connections")]
    pub max_open_conns: usize,
}

impl DatabaseConfig {
    /// Effective retry budget.
    pub fn retry_budget(&self) -> u32 {
        if self.max_connection_retries > 0 {
            u32::try_from(self.max_connection_retries).unwrap_or(u32::MAX)
        } else {
            DEFAULT_MAX_CONNECTION_RETRIES
        }
    }

    /// Maximum lifetime of a pooled connection; `None` means unlimited.
    pub fn conn_max_lifetime(&self) -> Option<Duration> {
        match self.conn_max_lifetime_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the write timeout.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Set the overall connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry budget. Values `<= 0` keep the default.
    pub fn max_connection_retries(mut self, retries: i64) -> Self {
        self.max_connection_retries = retries;
        self
    }
}

/// Resolve a configured value through the environment: when an environment
/// variable named exactly like the value is set and non-empty, its value wins.
pub fn resolve_env(value: &str) -> String {
    match std::env::var(value) {
        Ok(v) if !v.is_empty() => v,
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
database:
  driver: mysql
  host: localhost:3306
  name: api
  user: root
  password: DB_PASSWORD
  connection_max_life_time_seconds: 300
  connection_read_timeout: 2s
  connection_timeout: 1500000000
  max_connection_retries: 5
  max_idle_connections_per_host: 4
  max_open_connections: 16
rest_client:
  api_domain: http://localhost
  timeout: 1000
"#;

    #[test]
    fn parses_database_section() {
        let cfg: AppConfig = serde_yaml::from_str(SAMPLE).unwrap();
        let db = cfg.database;
        assert_eq!(db.driver, "mysql");
        assert_eq!(db.host, "localhost:3306");
        assert_eq!(db.conn_max_lifetime(), Some(Duration::from_secs(300)));
        assert_eq!(db.read_timeout, Some(Duration::from_secs(2)));
        assert_eq!(db.write_timeout, None);
        assert_eq!(db.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(db.retry_budget(), 5);
        assert_eq!(db.max_idle_conns, 4);
        assert_eq!(db.max_open_conns, 16);
    }

    #[test]
    fn retry_budget_defaults_when_not_positive() {
        let db = DatabaseConfig::default();
        assert_eq!(db.retry_budget(), DEFAULT_MAX_CONNECTION_RETRIES);
        assert_eq!(db.max_connection_retries(-2).retry_budget(), 3);
        assert_eq!(DatabaseConfig::default().max_connection_retries(1).retry_budget(), 1);
    }

    #[test]
    fn zero_lifetime_is_unlimited() {
        assert_eq!(DatabaseConfig::default().conn_max_lifetime(), None);
    }

    #[test]
    fn malformed_duration_is_a_config_error() {
        let err = serde_yaml::from_str::<AppConfig>(
            "database:\n  connection_read_timeout: soon\n",
        )
        .map_err(DbError::from)
        .unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn load_env_reads_config_dir() {
        let dir = std::env::temp_dir().join(format!("sqlkit-config-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("config")).unwrap();
        std::fs::write(config_path(&dir, "local"), SAMPLE).unwrap();

        let cfg = AppConfig::load_env(&dir, "local").unwrap();
        assert_eq!(cfg.database.name, "api");

        let missing = AppConfig::load_env(&dir, "prod").unwrap_err();
        assert!(matches!(missing, DbError::Config(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resolve_env_prefers_set_variable() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("SQLKIT_TEST_RESOLVE_ENV", "from-env") };
        assert_eq!(resolve_env("SQLKIT_TEST_RESOLVE_ENV"), "from-env");
        assert_eq!(resolve_env("SQLKIT_TEST_UNSET_VARIABLE"), "SQLKIT_TEST_UNSET_VARIABLE");
    }
}
