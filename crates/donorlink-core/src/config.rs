use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_REVERSE_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const DEFAULT_IP_GEOLOCATE_URL: &str = "http://ip-api.com/json/";
const DEFAULT_GEOCODE_USER_AGENT: &str = "donorlink/0.1 (blood-request-backend)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("DONORLINK_ENV", "development"))?;

    let bind_addr = parse_addr("DONORLINK_BIND_ADDR", "0.0.0.0:4000")?;
    let log_level = or_default("DONORLINK_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("DONORLINK_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("DONORLINK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DONORLINK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let reverse_geocode_url =
        or_default("DONORLINK_REVERSE_GEOCODE_URL", DEFAULT_REVERSE_GEOCODE_URL);
    let ip_geolocate_url = or_default("DONORLINK_IP_GEOLOCATE_URL", DEFAULT_IP_GEOLOCATE_URL);
    let geocode_user_agent = or_default("DONORLINK_GEOCODE_USER_AGENT", DEFAULT_GEOCODE_USER_AGENT);
    let geocode_accept_language = or_default("DONORLINK_GEOCODE_ACCEPT_LANGUAGE", "en");
    let geocode_contact_email = optional("DONORLINK_GEOCODE_CONTACT_EMAIL");
    let reverse_geocode_timeout_secs = parse_u64("DONORLINK_REVERSE_GEOCODE_TIMEOUT_SECS", "10")?;
    let ip_geolocate_timeout_secs = parse_u64("DONORLINK_IP_GEOLOCATE_TIMEOUT_SECS", "5")?;
    let resolve_concurrency = parse_usize("DONORLINK_RESOLVE_CONCURRENCY", "2")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        reverse_geocode_url,
        ip_geolocate_url,
        geocode_user_agent,
        geocode_accept_language,
        geocode_contact_email,
        reverse_geocode_timeout_secs,
        ip_geolocate_timeout_secs,
        resolve_concurrency,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DONORLINK_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
