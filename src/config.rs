use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use strum_macros::{AsRefStr, EnumString};

/// What a per-user history lookup returns when the user has no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EmptyResultPolicy {
    /// 404 with `success: false`.
    NotFound,
    /// 200 with an empty `data` array.
    Empty,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,

    pub api_prefix: String,
    pub rate_protected_per_min: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,

    pub empty_history_policy: EmptyResultPolicy,
    pub expose_store_errors: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: var("DATABASE_URL").context("DATABASE_URL must be set")?,
            server_addr: var("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            database_max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_or(&var, "RUN_MIGRATIONS", true)?,

            api_prefix: var("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            rate_protected_per_min: parse_or(&var, "RATE_PROTECTED_PER_MIN", 1000)?,

            log_dir: var("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&var, "LOG_LEVEL", tracing::Level::DEBUG)?,

            empty_history_policy: parse_or(
                &var,
                "EMPTY_HISTORY_POLICY",
                EmptyResultPolicy::NotFound,
            )?,
            expose_store_errors: parse_or(&var, "EXPOSE_STORE_ERRORS", false)?,
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid value {:?} for {}: {}", raw, key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = config_from(&[("DATABASE_URL", "mysql://root@localhost/absen")]).unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.database_max_connections, 10);
        assert!(config.run_migrations);
        assert_eq!(config.rate_protected_per_min, 1000);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.empty_history_policy, EmptyResultPolicy::NotFound);
        assert!(!config.expose_store_errors);
    }

    #[test]
    fn database_url_is_required() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("DATABASE_URL", "mysql://root@localhost/absen"),
            ("SERVER_ADDR", "0.0.0.0:9000"),
            ("EMPTY_HISTORY_POLICY", "empty"),
            ("EXPOSE_STORE_ERRORS", "true"),
            ("LOG_LEVEL", "warn"),
            ("RUN_MIGRATIONS", "false"),
        ])
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:9000");
        assert_eq!(config.empty_history_policy, EmptyResultPolicy::Empty);
        assert!(config.expose_store_errors);
        assert_eq!(config.log_level, tracing::Level::WARN);
        assert!(!config.run_migrations);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config_from(&[
            ("DATABASE_URL", "mysql://root@localhost/absen"),
            ("EMPTY_HISTORY_POLICY", "sometimes"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("EMPTY_HISTORY_POLICY"));

        let err = config_from(&[
            ("DATABASE_URL", "mysql://root@localhost/absen"),
            ("RATE_PROTECTED_PER_MIN", "lots"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("RATE_PROTECTED_PER_MIN"));
    }
}
