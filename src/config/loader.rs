//! Load configuration from environment variables (optionally seeded from `.env`).

use crate::config::types::*;
use crate::config::{normalize_base_path, validate_schema_name};
use crate::error::ConfigError;
use std::str::FromStr;

impl AppConfig {
    /// Read `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::Load(e.to_string()));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any variable source. Unset or empty variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();

        let store = match get("CUSTOMER_STORE") {
            Some(v) => parse("CUSTOMER_STORE", &v)?,
            None => defaults.store,
        };
        let schema = get("CUSTOMER_SCHEMA").unwrap_or(defaults.schema);
        validate_schema_name(&schema)?;
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => parse::<u32>("DB_MAX_CONNECTIONS", &v)?,
            None => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                var: "DB_MAX_CONNECTIONS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        let bind_addr = match get("BIND_ADDR") {
            Some(v) => parse("BIND_ADDR", &v)?,
            None => defaults.bind_addr,
        };
        // BASE_PATH may be set to "/" deliberately, so it is read without the empty filter.
        let base_path = match lookup("BASE_PATH") {
            Some(v) => normalize_base_path(&v)?,
            None => defaults.base_path,
        };
        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(v) => parse("BODY_LIMIT_BYTES", &v)?,
            None => defaults.body_limit_bytes,
        };

        Ok(AppConfig {
            store,
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            schema,
            max_connections,
            bind_addr,
            base_path,
            body_limit_bytes,
        })
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let c = load(&[]).expect("config");
        assert_eq!(c.store, StoreBackend::Postgres);
        assert_eq!(c.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(c.schema, "public");
        assert_eq!(c.max_connections, 5);
        assert_eq!(c.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(c.base_path, "/fin-customer");
        assert_eq!(c.body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn overrides_are_parsed() {
        let c = load(&[
            ("CUSTOMER_STORE", "Memory"),
            ("DATABASE_URL", "postgres://db/crm"),
            ("CUSTOMER_SCHEMA", "crm"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("BASE_PATH", "crm/"),
            ("BODY_LIMIT_BYTES", "2048"),
        ])
        .expect("config");
        assert_eq!(c.store, StoreBackend::Memory);
        assert_eq!(c.database_url, "postgres://db/crm");
        assert_eq!(c.schema, "crm");
        assert_eq!(c.max_connections, 12);
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.base_path, "/crm");
        assert_eq!(c.body_limit_bytes, 2048);
    }

    #[test]
    fn root_base_path_mounts_at_root() {
        let c = load(&[("BASE_PATH", "/")]).expect("config");
        assert_eq!(c.base_path, "");
        assert_eq!(c.path("/customer"), "/customer");
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[("CUSTOMER_STORE", "mongo")]).unwrap_err();
        assert!(err.to_string().contains("CUSTOMER_STORE"));

        let err = load(&[("DB_MAX_CONNECTIONS", "many")]).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));

        let err = load(&[("DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        let err = load(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
