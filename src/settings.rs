//! Runtime settings from environment variables (optionally loaded from `.env`).

use crate::error::ConfigError;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// One year.
const MAX_SESSION_TTL_HOURS: u64 = 24 * 366;

/// Which [`Store`](crate::store::Store) implementation backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local tables; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("expected postgres or memory, got {}", s)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_ttl: Duration,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "postgres://localhost/pharmacy".into(),
            store_backend: StoreBackend::Postgres,
            bind_addr: "0.0.0.0:3000".into(),
            db_max_connections: 5,
            session_ttl: Duration::from_secs(24 * 3600),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let ttl_hours: u64 = parse_or(&lookup, "SESSION_TTL_HOURS", 24)?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            return Err(ConfigError::InvalidValue {
                key: "SESSION_TTL_HOURS",
                message: format!("must be between 1 and {}", MAX_SESSION_TTL_HOURS),
            });
        }
        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            store_backend: parse_or(&lookup, "STORE_BACKEND", defaults.store_backend)?,
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            session_ttl: Duration::from_secs(ttl_hours * 3600),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.store_backend, StoreBackend::Postgres);
        assert_eq!(s.bind_addr, "0.0.0.0:3000");
        assert_eq!(s.session_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn reads_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("STORE_BACKEND", "Memory"),
            ("SESSION_TTL_HOURS", "2"),
            ("DB_MAX_CONNECTIONS", "10"),
        ]))
        .unwrap();
        assert_eq!(s.store_backend, StoreBackend::Memory);
        assert_eq!(s.session_ttl, Duration::from_secs(7200));
        assert_eq!(s.db_max_connections, 10);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Settings::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
        assert!(Settings::from_lookup(lookup(&[("STORE_BACKEND", "redis")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("SESSION_TTL_HOURS", "0")])).is_err());
    }

    #[test]
    fn session_ttl_is_capped_at_a_year() {
        assert!(Settings::from_lookup(lookup(&[("SESSION_TTL_HOURS", "8784")])).is_ok());
        let err = Settings::from_lookup(lookup(&[("SESSION_TTL_HOURS", "10000000000")])).unwrap_err();
        assert!(err.to_string().contains("SESSION_TTL_HOURS"));
    }
}
