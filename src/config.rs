use std::{
    num::{NonZeroU32, NonZeroU64},
    time::Duration,
};

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// How the pool reaches Postgres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// `DATABASE_URL` was set; used verbatim.
    Url(String),
    /// Assembled from the individual `DB_*` variables.
    Parts {
        host: String,
        user: String,
        password: String,
        database: String,
        port: u16,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    pub acquire_timeout: Duration,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server_host: String,
    pub server_port: u16,
    /// Adds the permissive cross-origin headers and the `OPTIONS` route.
    pub cors_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let target = match env.get("DATABASE_URL") {
            Some(url) => DatabaseTarget::Url(url),
            None => DatabaseTarget::Parts {
                host: env.required("DB_HOST")?,
                user: env.required("DB_USER")?,
                password: env.required("DB_PASS")?,
                database: env.required("DB_NAME")?,
                port: env
                    .required("DB_PORT")?
                    .parse()
                    .context("DB_PORT must be a valid port number")?,
            },
        };

        Ok(Self {
            database: DatabaseConfig {
                target,
                max_connections: env
                    .optional("DB_MAX_CONNECTIONS", "10")
                    .parse::<NonZeroU32>()
                    .context("DB_MAX_CONNECTIONS must be a positive integer")?
                    .get(),
                acquire_timeout: Duration::from_secs(
                    env.optional("DB_ACQUIRE_TIMEOUT_SECS", "30")
                        .parse::<NonZeroU64>()
                        .context("DB_ACQUIRE_TIMEOUT_SECS must be a positive integer")?
                        .get(),
                ),
            },
            server_host: env.optional("SERVER_HOST", "0.0.0.0"),
            server_port: env
                .optional("SERVER_PORT", "3000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            cors_enabled: parse_bool(&env.optional("CORS_ENABLED", "true"))
                .context("CORS_ENABLED must be true or false")?,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Empty values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .with_context(|| format!("missing required env var: {key}"))
    }

    fn optional(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_owned())
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("not a boolean: {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const DB_PARTS: &[(&str, &str)] = &[
        ("DB_HOST", "localhost"),
        ("DB_USER", "iot"),
        ("DB_PASS", "secret"),
        ("DB_NAME", "telemetry"),
        ("DB_PORT", "5432"),
    ];

    #[test]
    fn database_parts_with_defaults() {
        let config = config_from(DB_PARTS).unwrap();
        assert_eq!(
            config.database.target,
            DatabaseTarget::Parts {
                host: "localhost".into(),
                user: "iot".into(),
                password: "secret".into(),
                database: "telemetry".into(),
                port: 5432,
            }
        );
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(30));
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3000);
        assert!(config.cors_enabled);
    }

    #[test]
    fn database_url_takes_precedence() {
        let config = config_from(&[("DATABASE_URL", "postgres://u:p@db/x")]).unwrap();
        assert_eq!(
            config.database.target,
            DatabaseTarget::Url("postgres://u:p@db/x".into())
        );
    }

    #[test]
    fn missing_db_part_names_the_variable() {
        let partial: Vec<_> = DB_PARTS
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DB_PASS")
            .collect();
        let err = config_from(&partial).unwrap_err();
        assert!(err.to_string().contains("DB_PASS"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut vars = DB_PARTS.to_vec();
        vars.retain(|(k, _)| *k != "DB_HOST");
        vars.push(("DB_HOST", "  "));
        let err = config_from(&vars).unwrap_err();
        assert!(err.to_string().contains("DB_HOST"));
    }

    #[test]
    fn invalid_port_errors() {
        let mut vars = DB_PARTS.to_vec();
        vars.push(("SERVER_PORT", "http"));
        let err = config_from(&vars).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }

    #[test]
    fn zero_pool_bounds_are_rejected() {
        let mut vars = DB_PARTS.to_vec();
        vars.push(("DB_MAX_CONNECTIONS", "0"));
        let err = config_from(&vars).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));

        let mut vars = DB_PARTS.to_vec();
        vars.push(("DB_ACQUIRE_TIMEOUT_SECS", "0"));
        let err = config_from(&vars).unwrap_err();
        assert!(err.to_string().contains("DB_ACQUIRE_TIMEOUT_SECS"));

        let mut vars = DB_PARTS.to_vec();
        vars.push(("DB_MAX_CONNECTIONS", "4"));
        vars.push(("DB_ACQUIRE_TIMEOUT_SECS", "5"));
        let config = config_from(&vars).unwrap();
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn cors_can_be_disabled() {
        let mut vars = DB_PARTS.to_vec();
        vars.push(("CORS_ENABLED", "false"));
        assert!(!config_from(&vars).unwrap().cors_enabled);

        vars.pop();
        vars.push(("CORS_ENABLED", "maybe"));
        assert!(config_from(&vars).is_err());
    }
}
