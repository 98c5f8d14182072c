use std::env;

use super::types::{ConfigError, Environment};

/// First non-blank value among `keys`, so renamed variables keep working.
pub(super) fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
    })
}

pub(super) fn env_flag(key: &str) -> Option<bool> {
    env_first(&[key]).map(|value| parse_bool(&value))
}

pub(super) fn env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env_first(&[key]) {
        Some(value) => {
            value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field: key, value })
        }
        None => Ok(default),
    }
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub(super) fn parse_environment(value: Option<&str>) -> Environment {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("production" | "prod") => Environment::Production,
        Some("staging") => Environment::Staging,
        Some("test" | "testing") => Environment::Test,
        _ => Environment::Development,
    }
}
