use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

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
/// Does not read `.env` files; the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment, so
/// tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let places_api_key = require("GOOGLE_PLACES_API_KEY")?;

    let env = parse_environment(&or_default("DSCVR_ENV", "development"));
    let bind_addr = parse_addr("DSCVR_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("DSCVR_LOG_LEVEL", "info");

    let places_base_url = or_default("DSCVR_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    if !places_base_url.starts_with("http://") && !places_base_url.starts_with("https://") {
        return Err(invalid(
            "DSCVR_PLACES_BASE_URL",
            format!("expected an http(s) URL, got \"{places_base_url}\""),
        ));
    }
    let places_timeout_secs = parse_u64("DSCVR_PLACES_TIMEOUT_SECS", "15")?;
    // reqwest treats a zero timeout as "fail immediately".
    if places_timeout_secs == 0 {
        return Err(invalid(
            "DSCVR_PLACES_TIMEOUT_SECS",
            "must be greater than zero".to_owned(),
        ));
    }
    let places_max_retries = parse_u32("DSCVR_PLACES_MAX_RETRIES", "2")?;
    let places_backoff_base_ms = parse_u64("DSCVR_PLACES_BACKOFF_BASE_MS", "500")?;

    let search_radius_meters = parse_u32("DSCVR_SEARCH_RADIUS_METERS", "5000")?;
    // Google caps nearby search at 50 km.
    if search_radius_meters == 0 || search_radius_meters > 50_000 {
        return Err(invalid(
            "DSCVR_SEARCH_RADIUS_METERS",
            format!("must be between 1 and 50000, got {search_radius_meters}"),
        ));
    }

    let db_max_connections = parse_u32("DSCVR_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("DSCVR_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DSCVR_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        places_timeout_secs,
        places_max_retries,
        places_backoff_base_ms,
        search_radius_meters,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
