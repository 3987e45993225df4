//! Application configuration read from the environment.

use std::net::SocketAddr;

/// Environment variable names recognized at startup.
const BIND_ADDR: &str = "BIND_ADDR";
const DATABASE_URL: &str = "DATABASE_URL";
const DB_POOL_MAX_SIZE: &str = "DB_POOL_MAX_SIZE";
const ADMIN_TOKEN: &str = "ADMIN_TOKEN";
const RESPONSE_BASE_URL: &str = "RESPONSE_BASE_URL";
const MAIL_DROP_DIR: &str = "MAIL_DROP_DIR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable was absent or blank.
    #[error("missing required configuration: {name}")]
    Missing {
        /// The variable name.
        name: &'static str,
    },
    /// A variable was present but could not be parsed.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Maximum connections in the database pool.
    pub pool_max_size: u32,
    /// Static bearer token guarding administrator endpoints.
    pub admin_token: String,
    /// Base URL invitation links are built from; the token is appended as
    /// the final path segment.
    pub response_base_url: String,
    /// When set, invitations are written to this directory instead of being
    /// emailed.
    pub mail_drop_dir: Option<String>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through a lookup closure.
    ///
    /// Tests inject their own lookup instead of mutating the process
    /// environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing { name })
        };

        let bind_raw = lookup(BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: BIND_ADDR,
            value: bind_raw.clone(),
        })?;

        let pool_max_size = match lookup(DB_POOL_MAX_SIZE) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: DB_POOL_MAX_SIZE,
                value: raw.clone(),
            })?,
            None => DEFAULT_POOL_MAX_SIZE,
        };

        Ok(Self {
            bind_addr,
            database_url: required(DATABASE_URL)?,
            pool_max_size,
            admin_token: required(ADMIN_TOKEN)?,
            response_base_url: required(RESPONSE_BASE_URL)?,
            mail_drop_dir: lookup(MAIL_DROP_DIR).filter(|value| !value.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, String> {
        HashMap::from([
            (DATABASE_URL, "postgres://localhost/pollwise".to_owned()),
            (ADMIN_TOKEN, "sekrit".to_owned()),
            (
                RESPONSE_BASE_URL,
                "https://surveys.test/respond".to_owned(),
            ),
        ])
    }

    fn config_from(vars: HashMap<&'static str, String>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[rstest]
    fn minimal_configuration_applies_defaults() {
        let config = config_from(base_vars()).expect("valid configuration");

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.pool_max_size, 10);
        assert!(config.mail_drop_dir.is_none());
    }

    #[rstest]
    #[case(DATABASE_URL)]
    #[case(ADMIN_TOKEN)]
    #[case(RESPONSE_BASE_URL)]
    fn missing_required_variable_is_an_error(#[case] name: &'static str) {
        let mut vars = base_vars();
        vars.remove(name);

        let error = config_from(vars).expect_err("missing variable");
        assert_eq!(error, ConfigError::Missing { name });
    }

    #[rstest]
    fn blank_admin_token_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert(ADMIN_TOKEN, "   ".to_owned());

        let error = config_from(vars).expect_err("blank token");
        assert_eq!(error, ConfigError::Missing { name: ADMIN_TOKEN });
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let mut vars = base_vars();
        vars.insert(BIND_ADDR, "not-an-address".to_owned());

        let error = config_from(vars).expect_err("bad address");
        assert!(matches!(error, ConfigError::Invalid { name: BIND_ADDR, .. }));
    }

    #[rstest]
    fn drop_directory_is_passed_through() {
        let mut vars = base_vars();
        vars.insert(MAIL_DROP_DIR, "/tmp/pollwise-mail".to_owned());

        let config = config_from(vars).expect("valid configuration");
        assert_eq!(config.mail_drop_dir.as_deref(), Some("/tmp/pollwise-mail"));
    }
}
