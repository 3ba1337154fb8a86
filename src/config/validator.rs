//! Checks and normalization for configuration values that end up in SQL or URLs.

use crate::error::ConfigError;
use regex::Regex;

const BASE_PATH_PATTERN: &str = r"^[A-Za-z0-9._~-]+(/[A-Za-z0-9._~-]+)*$";
const SCHEMA_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]{0,62}$";

fn matches(var: &'static str, pattern: &str, value: &str) -> Result<bool, ConfigError> {
    let re = Regex::new(pattern).map_err(|e| ConfigError::Load(format!("invalid pattern for {}: {}", var, e)))?;
    Ok(re.is_match(value))
}

/// Normalize a route prefix: "" and "/" mean no prefix; otherwise a leading slash is added and
/// trailing slashes are removed.
pub fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !matches("BASE_PATH", BASE_PATH_PATTERN, trimmed)? {
        return Err(ConfigError::InvalidValue {
            var: "BASE_PATH",
            value: raw.to_string(),
            reason: "segments may contain only letters, digits, '-', '_', '.', '~'".into(),
        });
    }
    Ok(format!("/{}", trimmed))
}

/// Schema names are quoted in SQL, but are still restricted to plain identifiers.
pub fn validate_schema_name(name: &str) -> Result<(), ConfigError> {
    if !matches("CUSTOMER_SCHEMA", SCHEMA_PATTERN, name)? {
        return Err(ConfigError::InvalidValue {
            var: "CUSTOMER_SCHEMA",
            value: name.to_string(),
            reason: "must be a plain PostgreSQL identifier".into(),
        });
    }
    Ok(())
}
